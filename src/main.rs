use std::error::Error;

use castmatch::config::Settings;
use castmatch::{cached_configuration, match_movies, match_season, ConfigCache, MatchOptions, MediaDetail, TmdbClient};
use futures::future::try_join_all;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

fn init_logging(verbose: bool) -> Result<(), Box<dyn Error>> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {t} - {m}{n}")))
        .build();
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

/// Match options with the image base taken from the catalog configuration.
async fn match_options(settings: &Settings, client: &TmdbClient) -> Result<MatchOptions, Box<dyn Error>> {
    let mut options = MatchOptions::with_size(&settings.size_token);
    let cache = match ConfigCache::new(&settings.cache_file) {
        Ok(cache) => cache,
        Err(e) => {
            log::warn!("Could not open cache {:?}, caching in memory: {}", settings.cache_file, e);
            ConfigCache::in_memory()?
        }
    };
    match cached_configuration(client, &cache, settings.cache_max_age).await {
        Ok(config) => {
            if !config.supports_size(&settings.size_token) {
                log::warn!("Catalog does not advertise image size {:?}", settings.size_token);
            }
            options.image_base = config.images.secure_base_url;
        }
        Err(e) => log::warn!("Could not load catalog configuration, using default image base: {}", e),
    }
    Ok(options)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let settings = Settings::from_env_args();
    init_logging(settings.verbose)?;

    let client = TmdbClient::new(&settings.api_key, &settings.language)?;
    let options = match_options(&settings, &client).await?;

    let cancel = options.cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, cancelling");
            cancel.cancel();
        }
    });

    let movies = try_join_all(settings.movie_folders.iter().map(|folder| match_movies(&client, folder, &options)));
    let seasons = try_join_all(settings.tv_folders.iter().map(|folder| match_season(&client, folder, &options)));
    let (movies, seasons) = futures::try_join!(movies, seasons)?;

    let details: Vec<MediaDetail> = movies.into_iter().chain(seasons).flatten().collect();
    log::info!(target: "cli", "Matched {} media files", details.len());
    println!("{}", serde_json::to_string_pretty(&details)?);
    Ok(())
}
