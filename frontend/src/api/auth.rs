use reqwest::header::CONTENT_TYPE;

use super::{
    client::ApiClient,
    types::{ApiError, PasswordResetRequest, StatusEnvelope},
    PasswordResetApi,
};

impl PasswordResetApi for ApiClient {
    async fn request_password_reset(&self, action_url: &str, email: &str) -> Result<(), ApiError> {
        let headers = self.script_headers()?;
        let response = self
            .http_client()
            .post(self.endpoint(action_url))
            .headers(headers)
            .header(CONTENT_TYPE, "application/json")
            .json(&PasswordResetRequest { email })
            .send()
            .await
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))?;
        let envelope: StatusEnvelope = Self::decode(response).await?;
        envelope.into_result()
    }
}
