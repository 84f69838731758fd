use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_derive::{Deserialize, Serialize};
use url::Url;

use crate::error::CatalogError;

const TMDB_API_URL: &str = "https://api.themoviedb.org/3/";

// {"page":1,"results":[{"id":949,"title":"Heat","overview":"Obsessive master thief ...","poster_path":"/umSVjVdbVwtx5ryCA2QXL44Durm.jpg","release_date":"1995-12-15"}],"total_results":1}

#[derive(Deserialize, Debug)]
struct SearchResponse<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct MovieSearchResult {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ShowSearchResult {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EpisodeRecord {
    pub id: i64,
    pub episode_number: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: String,
    pub still_path: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SeasonDetails {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub episodes: Vec<EpisodeRecord>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ImagesConfiguration {
    pub base_url: String,
    pub secure_base_url: String,
    #[serde(default)]
    pub poster_sizes: Vec<String>,
    #[serde(default)]
    pub still_sizes: Vec<String>,
}

/// The catalog's `/configuration` object; only the image section is kept.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CatalogConfiguration {
    pub images: ImagesConfiguration,
}

impl CatalogConfiguration {
    pub fn supports_size(&self, size_token: &str) -> bool {
        self.images.poster_sizes.iter().chain(&self.images.still_sizes).any(|s| s == size_token)
    }
}

/// Remote media catalog the reconcilers query.
///
/// Results come back in the catalog's relevance order; callers take the first.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSearchResult>, CatalogError>;

    async fn search_shows(&self, query: &str) -> Result<Vec<ShowSearchResult>, CatalogError>;

    /// `Ok(None)` when the catalog has no such season.
    async fn season_details(&self, show_id: i64, season_number: i32) -> Result<Option<SeasonDetails>, CatalogError>;
}

/// TMDB v3 client.
pub struct TmdbClient {
    client: reqwest::Client,
    api_key: String,
    language: String,
    base_url: Url,
}

impl TmdbClient {
    pub fn new(api_key: &str, language: &str) -> Result<Self, CatalogError> {
        Self::with_base_url(api_key, language, Url::parse(TMDB_API_URL)?)
    }

    /// `base_url` must end with a slash for relative endpoints to resolve beneath it.
    pub fn with_base_url(api_key: &str, language: &str, base_url: Url) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().gzip(true).build()?;
        Ok(TmdbClient {
            client,
            api_key: api_key.to_owned(),
            language: language.to_owned(),
            base_url,
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, CatalogError> {
        let mut url = self.base_url.join(path)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.api_key).append_pair("language", &self.language);
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn send(&self, path: &str, params: &[(&str, &str)]) -> Result<reqwest::Response, CatalogError> {
        if self.api_key.is_empty() {
            return Err(CatalogError::MissingApiKey);
        }
        let url = self.endpoint(path, params)?;
        log::debug!("GET {}{}", self.base_url, path);
        Ok(self.client.get(url).send().await?)
    }

    async fn decode<T: DeserializeOwned>(path: &str, resp: reqwest::Response) -> Result<T, CatalogError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status { status: status.as_u16(), url: path.to_owned() });
        }
        Ok(resp.json::<T>().await?)
    }

    /// GETs `path` and decodes the body. Any non-success status is an error.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T, CatalogError> {
        let resp = self.send(path, params).await?;
        Self::decode(path, resp).await
    }

    /// Like [`Self::get_json`], but a 404 means the resource does not exist.
    async fn get_json_optional<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<Option<T>, CatalogError> {
        let resp = self.send(path, params).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::decode(path, resp).await.map(Some)
    }

    async fn search<T: DeserializeOwned>(&self, path: &str, query: &str) -> Result<Vec<T>, CatalogError> {
        let resp = self.get_json::<SearchResponse<T>>(path, &[("query", query)]).await?;
        Ok(resp.results)
    }

    pub async fn configuration(&self) -> Result<CatalogConfiguration, CatalogError> {
        self.get_json("configuration", &[]).await
    }
}

#[async_trait]
impl CatalogClient for TmdbClient {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSearchResult>, CatalogError> {
        self.search("search/movie", query).await
    }

    async fn search_shows(&self, query: &str) -> Result<Vec<ShowSearchResult>, CatalogError> {
        self.search("search/tv", query).await
    }

    async fn season_details(&self, show_id: i64, season_number: i32) -> Result<Option<SeasonDetails>, CatalogError> {
        self.get_json_optional(&format!("tv/{show_id}/season/{season_number}"), &[]).await
    }
}
