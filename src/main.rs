mod config;
mod http_server;
mod logging;
mod ports;
mod services;
mod session;
mod timeline;
mod video_id;

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{
    config::Config,
    http_server::{http_routes::videos::NO_TIMELINE_MESSAGE, state::AppState},
    logging::setup_logging,
    ports::{spotify::TrackSearch, youtube::YoutubeApi},
    services::{
        isrc_lookup::{IsrcLookupRequest, IsrcLookupService, format_duration, youtube_search_url},
        recommendation::RecommendationService,
        spotify::client::SpotifyCatalogClient,
        youtube::client::YoutubeDataClient,
    },
    session::{SessionContext, SessionUser},
    timeline::{TimelineExtractor, timeline_text},
    video_id::extract_video_id,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "PLUG_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Console log level (default: off)
    #[arg(long, default_value = "off", global = true, env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// File log level (default: debug)
    #[arg(long, default_value = "debug", global = true)]
    log_file_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, env = "PLUG_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    /// Read `Title - Artist` when the text after the dash is Korean
    #[arg(long, global = true)]
    hangul_aware_dash: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract the song timeline from a description (file or stdin)
    Extract {
        /// File containing the description; reads stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the songs as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the timeline of a YouTube video
    Timeline {
        /// YouTube URL or video id
        video: String,
    },
    /// Resolve the songs of a YouTube video to ISRCs
    Resolve {
        /// YouTube URL or video id
        video: String,

        /// Print the lookup as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the best Spotify match for a song
    Match {
        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        artist: String,
    },
    /// Show recommended tracks from the top Spotify playlist search result
    Reco {
        /// Print the tracks as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search YouTube videos
    Search {
        /// The search query
        query: String,
    },
    /// Serve the HTTP API
    Serve {
        /// The port to run the server on
        #[arg(short, long, default_value = "3000", env = "PLUG_HTTP_PORT")]
        port: u16,
    },
    #[command(subcommand)]
    Config(ConfigCommands),
    #[command(subcommand)]
    Session(SessionCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[derive(Subcommand, Debug)]
enum SessionCommands {
    /// Show the stored session
    Show {
        /// Print only the Authorization header value
        #[arg(long)]
        header: bool,
    },
    /// Store an access token obtained elsewhere
    Login {
        #[arg(long, env = "PLUG_ACCESS_TOKEN")]
        token: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Replace the stored access token
    SetToken {
        #[arg(long, env = "PLUG_ACCESS_TOKEN")]
        token: String,
    },
    /// Forget the stored session
    Logout,
}

fn read_description(input: Option<PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("Failed to read description from stdin")?;
            Ok(buffer)
        }
    }
}


#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_logging(args.log_level, args.log_file.clone(), args.log_file_level)?;

    log::debug!("Loading configuration");
    let config = {
        if let Some(config) = &args.config {
            Config::from_file(config)
        } else {
            Config::load()
        }
    }
    .with_context(|| "Failed to load plug config")?;

    let extractor =
        TimelineExtractor::from_flag(args.hangul_aware_dash || config.timeline.hangul_aware_dash);
    log::debug!("Song rule order: {:?}", extractor.rules());

    match args.command {
        Commands::Extract { input, json } => {
            let description = read_description(input)?;
            let songs = extractor.extract(Some(description.as_str()));
            if json {
                println!("{}", serde_json::to_string_pretty(&songs)?);
            } else {
                for song in &songs {
                    if song.artist.is_empty() {
                        println!("{}", song.title);
                    } else {
                        println!("{} - {}", song.title, song.artist);
                    }
                }
            }
            log::info!("Extracted {} songs", songs.len());
        }
        Commands::Timeline { video } => {
            let video_id = extract_video_id(&video)?;
            let youtube = YoutubeDataClient::from_config(&config)?;
            let description = youtube.video_description(&video_id).await?;
            match timeline_text(description.as_deref()) {
                Some(text) => println!("{}", text),
                None => println!("{}", NO_TIMELINE_MESSAGE),
            }
        }
        Commands::Resolve { video, json } => {
            let video_id = extract_video_id(&video)?;
            let youtube: Arc<dyn YoutubeApi> = Arc::new(YoutubeDataClient::from_config(&config)?);
            let tracks = Arc::new(SpotifyCatalogClient::from_config(&config)?);
            let service = IsrcLookupService::new(youtube, tracks, extractor);
            let lookup = service
                .lookup(IsrcLookupRequest {
                    video_id: Some(video_id),
                    extracted_songs: None,
                })
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&lookup)?);
            } else {
                for song in &lookup.songs {
                    println!(
                        "{} - {} [{}]",
                        song.title,
                        song.artist,
                        song.isrc.as_deref().unwrap_or("no isrc")
                    );
                }
                if !lookup.isrc_list.is_empty() {
                    println!();
                    println!("{}", youtube_search_url(&lookup.youtube_search_query));
                }
            }
        }
        Commands::Match { title, artist } => {
            let spotify = SpotifyCatalogClient::from_config(&config)?;
            match spotify.best_match(&title, &artist).await? {
                Some(track) => println!(
                    "{} - {} ({}) [{}] spotify:track:{}",
                    track.name,
                    track.artists.join(", "),
                    track.duration_ms.map(format_duration).unwrap_or_default(),
                    track.isrc.as_deref().unwrap_or("no isrc"),
                    track.id
                ),
                None => println!("No match"),
            }
        }
        Commands::Reco { json } => {
            let spotify = Arc::new(SpotifyCatalogClient::from_config(&config)?);
            let tracks = RecommendationService::new(spotify).recommend().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tracks)?);
            } else {
                for track in &tracks {
                    println!(
                        "{} - {} ({})",
                        track.name,
                        track.artist,
                        track.duration.as_deref().unwrap_or("?:??")
                    );
                }
            }
        }
        Commands::Search { query } => {
            let youtube = YoutubeDataClient::from_config(&config)?;
            let page = youtube.search_videos(&query).await?;
            for result in &page.results {
                println!(
                    "{}  {} ({})",
                    result.id, result.title, result.channel_title
                );
            }
            println!("{} total results", page.total_results);
        }
        Commands::Serve { port } => {
            let youtube: Arc<dyn YoutubeApi> = Arc::new(YoutubeDataClient::from_config(&config)?);
            // one client, so searches and recommendations share the token and rate limit
            let spotify = Arc::new(SpotifyCatalogClient::from_config(&config)?);
            let isrc_lookup =
                IsrcLookupService::new(youtube.clone(), spotify.clone(), extractor.clone());
            log::info!("Starting HTTP server on port: {}", port);
            http_server::app::start(
                port,
                AppState {
                    youtube,
                    isrc_lookup,
                    recommendations: RecommendationService::new(spotify),
                    extractor,
                },
            )
            .await?;
        }
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                log::debug!("Creating default config");
                let path = Config::create_default()?;
                println!("{}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
        Commands::Session(session_commands) => {
            let path = config
                .session_path()
                .ok_or_else(|| color_eyre::eyre::eyre!("No session path available"))?;
            let mut session = SessionContext::init_from_storage(path)?;
            match session_commands {
                SessionCommands::Show { header: true } => {
                    if let Some(header) = session.auth_header() {
                        println!("{}", header);
                    }
                }
                SessionCommands::Show { header: false } => {
                    if !session.is_authenticated() {
                        println!("Not logged in");
                    } else {
                        let user = session.user().cloned().unwrap_or_default();
                        println!(
                            "Logged in as {} <{}>",
                            user.name.as_deref().unwrap_or("unknown"),
                            user.email.as_deref().unwrap_or("no email")
                        );
                        if let Some(at) = session.logged_in_at() {
                            println!("Since {}", at.to_rfc3339());
                        }
                    }
                }
                SessionCommands::Login { token, name, email } => {
                    session.login(
                        token,
                        SessionUser {
                            id: None,
                            name,
                            email,
                        },
                    )?;
                    log::info!("Session stored at {}", session.path().display());
                }
                SessionCommands::SetToken { token } => {
                    session.set_token(token)?;
                    log::info!(
                        "Token updated, token valid: {}",
                        session.is_token_valid()
                    );
                }
                SessionCommands::Logout => {
                    session.logout()?;
                    log::info!("Logged out");
                }
            }
        }
    }

    Ok(())
}
