use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Failures raised by a [`crate::catalog::CatalogClient`].
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid catalog url: {0}")]
    Url(#[from] url::ParseError),

    #[error("catalog returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("no catalog API key configured")]
    MissingApiKey,
}

/// Failures of the batch matching operations.
///
/// A file or episode without a catalog match is not an error; it shows up as a
/// fallback record or an omitted episode instead.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("no video files found under {}", path.display())]
    EmptyInput { path: PathBuf },

    #[error("could not determine a season number from {}", path.display())]
    SeasonNotDetermined { path: PathBuf },

    #[error(transparent)]
    Remote(#[from] CatalogError),

    #[error("file enumeration failed: {0}")]
    Filesystem(#[from] walkdir::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("enumeration task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("cache error: {0}")]
    Cache(#[from] rusqlite::Error),

    #[error("operation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, MatchError>;

/// Races `fut` against `cancel`, mapping its error into [`MatchError`].
pub(crate) async fn until_cancelled<T, E, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, E>>,
    MatchError: From<E>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(MatchError::Cancelled),
        res = fut => res.map_err(MatchError::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_until_cancelled_passes_result_through() {
        let cancel = CancellationToken::new();
        let res = until_cancelled(&cancel, async { Ok::<_, CatalogError>(7) }).await;
        assert_eq!(res.unwrap(), 7);

        let res = until_cancelled(&cancel, async { Err::<u8, _>(CatalogError::MissingApiKey) }).await;
        assert!(matches!(res, Err(MatchError::Remote(CatalogError::MissingApiKey))));
    }

    #[tokio::test]
    async fn test_until_cancelled_stops_on_token() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let res = until_cancelled(&cancel, futures::future::pending::<std::result::Result<u8, CatalogError>>()).await;
        assert!(matches!(res, Err(MatchError::Cancelled)));
    }
}
