// src/client.rs

use crate::brewery::{Brewery, RawBrewery};
use crate::config::ClientConfig;
use crate::error::BreweryError;
use crate::query::SearchQuery;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use url::Url;

/// Client for the Open Brewery DB breweries endpoint.
///
/// `BreweryClient` owns the HTTP connection pool used for its requests. The
/// pool is released when the client is dropped, so a command builds one
/// client, passes it to whatever needs it, and lets it go out of scope when
/// done.
///
/// Each operation sends a single GET request and waits for it to finish.
/// Failures are never retried here.
///
/// ```rust,no_run
/// use brewcli::{BreweryClient, BreweryError};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), BreweryError> {
/// let client = BreweryClient::with_defaults()?;
///
/// for brewery in client.random_breweries(3).await? {
///     println!("{}", brewery);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BreweryClient {
    pub(crate) base_url: Url,
    pub(crate) http_client: Client,
}

impl BreweryClient {
    /// Creates a new `BreweryClient` from `config`.
    ///
    /// The base URL gets an `http://` scheme if it has none and loses any
    /// trailing slash. The User-Agent and Accept headers from `config` are
    /// sent with every request.
    ///
    /// # Errors
    /// `InvalidUrl` if the base URL cannot be used as a base,
    /// `InvalidHeaderValue` for header values that are not valid HTTP, and
    /// `Request` if the underlying client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, BreweryError> {
        let base_url = normalize_base_url(&config.base_url)?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).map_err(BreweryError::InvalidHeaderValue)?,
        );
        default_headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept).map_err(BreweryError::InvalidHeaderValue)?,
        );

        let mut builder = Client::builder().default_headers(default_headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(BreweryError::Request)?;

        log::debug!("BreweryClient initialized with base_url: {}", base_url);

        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// Client for the public directory with default settings.
    pub fn with_defaults() -> Result<Self, BreweryError> {
        Self::new(&ClientConfig::default())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetches `count` random breweries via `GET {base}/random?size={count}`.
    pub async fn get_random(&self, count: u32) -> Result<Vec<RawBrewery>, BreweryError> {
        if count == 0 {
            return Err(BreweryError::invalid("size", "must be a positive integer"));
        }
        let url = self.endpoint_url(&["random"])?;
        let params = [("size".to_string(), count.to_string())];
        self._get_json(url, &params).await
    }

    /// Fetches one brewery via `GET {base}/{id}`.
    pub async fn get_by_id(&self, id: &str) -> Result<RawBrewery, BreweryError> {
        if id.trim().is_empty() {
            return Err(BreweryError::invalid("id", "must not be empty"));
        }
        let url = self.endpoint_url(&[id])?;
        self._get_json(url, &[]).await
    }

    /// Runs a filtered search via `GET {base}?{params}`.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<RawBrewery>, BreweryError> {
        let url = self.endpoint_url(&[])?;
        self._get_json(url, &query.to_params()).await
    }

    /// [`get_random`](Self::get_random), mapped into [`Brewery`] values.
    pub async fn random_breweries(&self, count: u32) -> Result<Vec<Brewery>, BreweryError> {
        let raw = self.get_random(count).await?;
        raw.iter().map(Brewery::from_fields).collect()
    }

    /// [`get_by_id`](Self::get_by_id), mapped into a [`Brewery`].
    pub async fn brewery_by_id(&self, id: &str) -> Result<Brewery, BreweryError> {
        let raw = self.get_by_id(id).await?;
        Brewery::from_fields(&raw)
    }

    /// [`search`](Self::search), mapped into [`Brewery`] values.
    pub async fn search_breweries(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<Brewery>, BreweryError> {
        let raw = self.search(query).await?;
        raw.iter().map(Brewery::from_fields).collect()
    }

    // Appends path segments to the base URL. Segments are percent-encoded,
    // so an id can never escape the breweries path.
    pub(crate) fn endpoint_url(&self, segments: &[&str]) -> Result<Url, BreweryError> {
        let mut url = self.base_url.clone();
        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| {
                    BreweryError::InvalidUrl(format!(
                        "Base URL '{}' cannot take path segments",
                        self.base_url
                    ))
                })?
                .pop_if_empty()
                .extend(segments);
        }
        Ok(url)
    }
}

fn normalize_base_url(base_url: &str) -> Result<Url, BreweryError> {
    let mut temp_url_string = base_url.trim().to_string();

    // Ensure scheme is present
    if !temp_url_string.starts_with("http://") && !temp_url_string.starts_with("https://") {
        temp_url_string = format!("http://{}", temp_url_string);
    }

    let trimmed = temp_url_string.trim_end_matches('/');
    let parsed = Url::parse(trimmed)?;

    if parsed.cannot_be_a_base() || parsed.host_str().is_none() {
        return Err(BreweryError::InvalidUrl(format!(
            "The base URL '{}' resolved to '{}', which cannot be a base URL. Please provide a full URL (e.g., {}).",
            base_url,
            parsed,
            crate::config::DEFAULT_BASE_URL
        )));
    }

    Ok(parsed)
}
