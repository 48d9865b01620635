use crate::error::BreweryError;

use reqwest::Response as HttpResponse;
use serde::de::DeserializeOwned;
use url::Url;

impl crate::BreweryClient {
    // Issues a GET for `url` with `params` appended to its query string and
    // decodes the JSON body into `R`.
    pub(crate) async fn _get_json<R: DeserializeOwned>(
        &self,
        mut url: Url,
        params: &[(String, String)],
    ) -> Result<R, BreweryError> {
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        log::debug!("Preparing request: Method=GET, URL={}", url);

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(BreweryError::Request)?;

        self._process_response(response, url.as_str()).await
    }

    // Maps a non-2xx status to `Transport` and an undecodable body to `Parse`,
    // both naming the requested URL.
    pub(crate) async fn _process_response<R: DeserializeOwned>(
        &self,
        response: HttpResponse,
        requested_url: &str,
    ) -> Result<R, BreweryError> {
        let status = response.status();
        log::debug!("Response from '{}': status {}", requested_url, status);

        if !status.is_success() {
            log::warn!("Request to '{}' failed with status {}", requested_url, status);
            return Err(BreweryError::Transport {
                url: requested_url.to_string(),
                status: status.as_u16(),
            });
        }

        let response_text = response.text().await.map_err(BreweryError::Request)?;

        serde_json::from_str::<R>(&response_text).map_err(|e| {
            log::warn!(
                "JSON deserialization failed for response from '{}'. Error: {}. Body: {}",
                requested_url,
                e,
                response_text.chars().take(200).collect::<String>()
            );
            BreweryError::Parse {
                url: requested_url.to_string(),
                message: e.to_string(),
            }
        })
    }
}
