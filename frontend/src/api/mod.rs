mod auth;
pub mod client;
mod feedback;
pub mod types;
mod visits;

pub use client::*;
pub use types::*;

/// Visit pass issuance (`/visit/generate/`, `/visit/generate-guest/`).
#[allow(async_fn_in_trait)]
pub trait VisitApi {
    async fn generate_unit_token(&self, booking_id: &str) -> Result<VisitPass, ApiError>;
    async fn generate_guest_token(&self, booking_id: &str) -> Result<VisitPass, ApiError>;
}

#[allow(async_fn_in_trait)]
pub trait PasswordResetApi {
    /// `action_url` comes from the form's `data-action`.
    async fn request_password_reset(&self, action_url: &str, email: &str) -> Result<(), ApiError>;
}

#[allow(async_fn_in_trait)]
pub trait FeedbackApi {
    async fn submit_feedback(&self, url: &str, fields: &[(String, String)]) -> Result<(), ApiError>;
}
