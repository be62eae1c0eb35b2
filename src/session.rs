//! Persisted login session, passed explicitly to whatever needs it.

use std::path::{Path, PathBuf};

use color_eyre::Result;
use color_eyre::eyre::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct SessionState {
    token: Option<String>,
    user: Option<SessionUser>,
    logged_in_at: Option<i64>,
}

#[derive(Debug)]
pub struct SessionContext {
    path: PathBuf,
    state: SessionState,
}

impl SessionContext {
    /// Restore the session stored at `path`; no file means logged out.
    pub fn init_from_storage(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .wrap_err_with(|| format!("Failed to read session file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .wrap_err_with(|| format!("Failed to parse session file: {}", path.display()))?
        } else {
            SessionState::default()
        };

        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn login(&mut self, token: String, user: SessionUser) -> Result<()> {
        self.state = SessionState {
            token: Some(token),
            user: Some(user),
            logged_in_at: Some(chrono::Utc::now().timestamp()),
        };
        self.persist()
    }

    pub fn set_token(&mut self, token: String) -> Result<()> {
        self.state.token = Some(token);
        self.persist()
    }

    /// Forget everything and remove the stored session.
    pub fn logout(&mut self) -> Result<()> {
        self.state = SessionState::default();
        if self.path.exists() {
            std::fs::remove_file(&self.path).wrap_err_with(|| {
                format!("Failed to remove session file: {}", self.path.display())
            })?;
        }
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_token_valid()
    }

    // No expiry information is kept, so any non-empty token counts
    pub fn is_token_valid(&self) -> bool {
        self.token().is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.state.token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.state.user.as_ref()
    }

    pub fn logged_in_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.state
            .logged_in_at
            .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
    }

    /// `Authorization` header value for API requests.
    pub fn auth_header(&self) -> Option<String> {
        self.token().map(|token| format!("Bearer {}", token))
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents =
            serde_json::to_string_pretty(&self.state).wrap_err("Failed to serialize session")?;
        std::fs::write(&self.path, contents)
            .wrap_err_with(|| format!("Failed to write session file: {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> SessionUser {
        SessionUser {
            id: Some("1".into()),
            name: Some("Tester".into()),
            email: Some("tester@example.com".into()),
        }
    }

    #[test]
    fn test_missing_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let session = SessionContext::init_from_storage(dir.path().join("session.json")).unwrap();

        assert!(!session.is_authenticated());
        assert_eq!(session.auth_header(), None);
        assert_eq!(session.user(), None);
    }

    #[test]
    fn test_login_persists_across_contexts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut session = SessionContext::init_from_storage(&path).unwrap();
        session.login("token-1".into(), user()).unwrap();
        assert!(session.is_authenticated());
        assert!(session.logged_in_at().is_some());

        let restored = SessionContext::init_from_storage(&path).unwrap();
        assert_eq!(restored.token(), Some("token-1"));
        assert_eq!(restored.user(), Some(&user()));
        assert_eq!(restored.auth_header().as_deref(), Some("Bearer token-1"));
    }

    #[test]
    fn test_set_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = SessionContext::init_from_storage(&path).unwrap();
        session.set_token("token-2".into()).unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.user(), None);

        session.set_token(String::new()).unwrap();
        assert!(!session.is_authenticated());
        assert!(!SessionContext::init_from_storage(&path).unwrap().is_token_valid());
    }

    #[test]
    fn test_logout_clears_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = SessionContext::init_from_storage(&path).unwrap();
        session.login("token".into(), user()).unwrap();
        session.logout().unwrap();

        assert!(!session.is_authenticated());
        assert!(!path.exists());
        // logging out twice is fine
        session.logout().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(SessionContext::init_from_storage(&path).is_err());
    }
}
