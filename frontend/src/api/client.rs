use reqwest::{header::HeaderMap, Client, Response};
use serde::de::DeserializeOwned;

use crate::{api::types::ApiError, config, utils::cookies};

pub const CSRF_HEADER: &str = "X-CSRFToken";
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";

pub struct ApiClient {
    client: Client,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.client
    }

    /// Absolute URL for an endpoint path taken from config or markup.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        join_url(&config::current().base_url(), path)
    }

    /// CSRF plus the marker that tells the backend this is a script call.
    pub(crate) fn script_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        let token = cookies::csrf_token(&config::current().csrf_cookie).unwrap_or_default();
        headers.insert(
            CSRF_HEADER,
            token
                .parse()
                .map_err(|_| ApiError::request_failed("Invalid CSRF token"))?,
        );
        headers.insert(
            REQUESTED_WITH_HEADER,
            REQUESTED_WITH_VALUE
                .parse()
                .map_err(|_| ApiError::request_failed("Invalid header"))?,
        );
        Ok(headers)
    }

    /// Error replies still carry a JSON body, so the status is only logged.
    pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            log::warn!("{} answered {}", response.url().path(), status);
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::decode(format!("Failed to parse response: {}", e)))
    }
}

pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") || base.is_empty() {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}
