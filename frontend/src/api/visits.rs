use super::{
    client::ApiClient,
    types::{ApiError, TokenEnvelope, VisitPass},
    VisitApi,
};
use crate::config;

impl ApiClient {
    async fn issue_token(&self, path: &str, booking_id: &str) -> Result<VisitPass, ApiError> {
        let headers = self.script_headers()?;
        let response = self
            .http_client()
            .post(self.endpoint(path))
            .headers(headers)
            .form(&[("booking_id", booking_id)])
            .send()
            .await
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))?;
        let envelope: TokenEnvelope = Self::decode(response).await?;
        envelope.into_pass()
    }
}

impl VisitApi for ApiClient {
    async fn generate_unit_token(&self, booking_id: &str) -> Result<VisitPass, ApiError> {
        let path = config::current().visit_generate_url;
        self.issue_token(&path, booking_id).await
    }

    async fn generate_guest_token(&self, booking_id: &str) -> Result<VisitPass, ApiError> {
        let path = config::current().visit_guest_url;
        let pass = self.issue_token(&path, booking_id).await?;
        if pass.guest_link.is_none() {
            return Err(ApiError::decode("response has no guest_link"));
        }
        Ok(pass)
    }
}
