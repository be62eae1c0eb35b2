use url::Url;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VideoIdError {
    #[error("Invalid YouTube URL or video id: {0}")]
    Invalid(String),
    #[error("Not a YouTube video URL: {0}")]
    NotYoutube(String),
}

fn is_youtube_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == "youtube.com" || host == "youtu.be" || host.ends_with(".youtube.com")
}

fn is_bare_video_id(input: &str) -> bool {
    !input.is_empty()
        && input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn video_id_from_url(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    if !is_youtube_host(host) {
        return None;
    }

    let mut segments = url.path_segments()?;
    let first = segments.next().unwrap_or("");

    // youtu.be/<id>
    if host.eq_ignore_ascii_case("youtu.be") {
        return (!first.is_empty()).then(|| first.to_string());
    }

    // youtube.com/watch?v=<id>
    if first == "watch" {
        return url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty());
    }

    // youtube.com/shorts/<id>, /embed/<id>
    if first == "shorts" || first == "embed" {
        return segments
            .next()
            .filter(|id| !id.is_empty())
            .map(str::to_string);
    }

    None
}

/// Resolve a pasted YouTube link, or a bare video id, to the video id.
pub fn extract_video_id(input: &str) -> Result<String, VideoIdError> {
    let input = input.trim();

    match Url::parse(input) {
        Ok(url) => video_id_from_url(&url).ok_or_else(|| VideoIdError::NotYoutube(input.into())),
        Err(_) if is_bare_video_id(input) => Ok(input.to_string()),
        Err(_) => Err(VideoIdError::Invalid(input.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_urls() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Ok("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://m.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"),
            Ok("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://music.youtube.com/watch?v=abc123&list=RD"),
            Ok("abc123".to_string())
        );
    }

    #[test]
    fn test_short_links_and_embeds() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?t=42"),
            Ok("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ"),
            Ok("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Ok("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_bare_id() {
        assert_eq!(
            extract_video_id("  dQw4w9WgXcQ "),
            Ok("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_rejects_other_urls() {
        assert!(matches!(
            extract_video_id("https://vimeo.com/12345"),
            Err(VideoIdError::NotYoutube(_))
        ));
        assert!(matches!(
            extract_video_id("https://www.youtube.com/watch"),
            Err(VideoIdError::NotYoutube(_))
        ));
        assert!(matches!(
            extract_video_id("https://youtu.be/"),
            Err(VideoIdError::NotYoutube(_))
        ));
        assert!(matches!(
            extract_video_id("not a url"),
            Err(VideoIdError::Invalid(_))
        ));
        assert!(matches!(extract_video_id(""), Err(VideoIdError::Invalid(_))));
    }
}
