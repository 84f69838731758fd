use std::path::PathBuf;
use std::time::Duration;

use crate::media::DEFAULT_SIZE_TOKEN;

pub const API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub movie_folders: Vec<PathBuf>,
    /// Each entry is a single season directory.
    pub tv_folders: Vec<PathBuf>,
    pub api_key: String,
    pub language: String,
    pub size_token: String,
    pub cache_file: PathBuf,
    pub cache_max_age: Duration,
    pub verbose: bool,
}

pub fn command() -> clap::Command {
    clap::Command::new("castmatch")
        .about("Match local movie files and TV season folders against TMDB")
        .arg(clap::Arg::new("movies-folder").long("movies-folder").action(clap::ArgAction::Append))
        .arg(clap::Arg::new("tv-folder").long("tv-folder").help("A season directory, e.g. \"Breaking Bad Season 3\"").action(clap::ArgAction::Append))
        .arg(clap::Arg::new("api-key").long("api-key").help("TMDB API key (default: $TMDB_API_KEY)"))
        .arg(clap::Arg::new("language").long("language").default_value("en-US"))
        .arg(clap::Arg::new("size").long("size").help("Artwork size token").default_value(DEFAULT_SIZE_TOKEN))
        .arg(clap::Arg::new("cache-file").long("cache-file").default_value("./.castmatch/cache.sqlite"))
        .arg(
            clap::Arg::new("cache-max-age-hours")
                .long("cache-max-age-hours")
                .value_parser(clap::value_parser!(u64))
                .default_value("24"),
        )
        .arg(clap::Arg::new("verbose").long("verbose").short('v').action(clap::ArgAction::SetTrue))
}

impl Settings {
    /// `env_api_key` is consulted only when `--api-key` is absent.
    pub fn from_matches(matches: &clap::ArgMatches, env_api_key: Option<String>) -> Settings {
        let paths = |id: &str| -> Vec<PathBuf> {
            matches.get_many::<String>(id).unwrap_or_default().map(PathBuf::from).collect()
        };
        let string = |id: &str| matches.get_one::<String>(id).cloned().unwrap_or_default();
        let hours = matches.get_one::<u64>("cache-max-age-hours").copied().unwrap_or(24);

        Settings {
            movie_folders: paths("movies-folder"),
            tv_folders: paths("tv-folder"),
            api_key: matches.get_one::<String>("api-key").cloned().or(env_api_key).unwrap_or_default(),
            language: string("language"),
            size_token: string("size"),
            cache_file: PathBuf::from(string("cache-file")),
            cache_max_age: Duration::from_secs(hours.saturating_mul(3600)),
            verbose: matches.get_flag("verbose"),
        }
    }

    pub fn from_env_args() -> Settings {
        Self::from_matches(&command().get_matches(), std::env::var(API_KEY_ENV).ok())
    }
}
