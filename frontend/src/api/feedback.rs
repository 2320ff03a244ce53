use super::{
    client::ApiClient,
    types::{ApiError, StatusEnvelope},
    FeedbackApi,
};

impl FeedbackApi for ApiClient {
    async fn submit_feedback(&self, url: &str, fields: &[(String, String)]) -> Result<(), ApiError> {
        let headers = self.script_headers()?;
        let response = self
            .http_client()
            .post(self.endpoint(url))
            .headers(headers)
            .form(fields)
            .send()
            .await
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))?;
        let envelope: StatusEnvelope = Self::decode(response).await?;
        envelope.into_result()
    }
}
