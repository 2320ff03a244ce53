use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.error.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{}", self.error)
        }
    }
}

impl std::error::Error for ApiError {}

pub const CODE_REQUEST_FAILED: &str = "REQUEST_FAILED";
pub const CODE_DECODE: &str = "DECODE_ERROR";
pub const CODE_SERVER: &str = "SERVER_ERROR";

impl ApiError {
    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: CODE_REQUEST_FAILED.to_string(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: CODE_DECODE.to_string(),
        }
    }

    /// `success: false` from the backend, with its text when it sent one.
    pub fn server(msg: Option<String>) -> Self {
        Self {
            error: msg.unwrap_or_default(),
            code: CODE_SERVER.to_string(),
        }
    }

    pub fn is_server(&self) -> bool {
        self.code == CODE_SERVER
    }

    /// Text the backend asked us to show, if any.
    pub fn server_message(&self) -> Option<&str> {
        (self.is_server() && !self.error.is_empty()).then_some(self.error.as_str())
    }
}

/// Body of `/visit/generate/` and `/visit/generate-guest/`. Error replies
/// come with a 4xx status and only `success`/`error` set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub full_code: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub guest_link: Option<String>,
    #[serde(default)]
    pub expires_in: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A QR access token issued for one booking.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitPass {
    pub full_code: String,
    pub token: String,
    pub expires_in_minutes: f64,
    pub guest_link: Option<String>,
}

impl VisitPass {
    pub fn expires_in_seconds(&self) -> u32 {
        (self.expires_in_minutes * 60.0).round().max(0.0) as u32
    }

    /// Minutes as the backend sent them: `15`, or `1.5`.
    pub fn expires_in_label(&self) -> String {
        if self.expires_in_minutes.fract() == 0.0 {
            format!("{}", self.expires_in_minutes as i64)
        } else {
            format!("{}", self.expires_in_minutes)
        }
    }
}

impl TokenEnvelope {
    pub fn into_pass(self) -> Result<VisitPass, ApiError> {
        if !self.success {
            return Err(ApiError::server(self.error));
        }
        let token = self
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::decode("response has no token"))?;
        let expires_in_minutes = self
            .expires_in
            .ok_or_else(|| ApiError::decode("response has no expires_in"))?;
        Ok(VisitPass {
            full_code: self.full_code.unwrap_or_default(),
            token,
            expires_in_minutes,
            guest_link: self.guest_link,
        })
    }
}

/// `{success, error?}` replies (password reset, feedback).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl StatusEnvelope {
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.success {
            Ok(())
        } else {
            Err(ApiError::server(self.error))
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetRequest<'a> {
    pub email: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_error_helpers_set_expected_codes() {
        assert_eq!(ApiError::request_failed("offline").code, CODE_REQUEST_FAILED);
        assert_eq!(ApiError::decode("bad json").code, CODE_DECODE);
        let server = ApiError::server(Some("Booking not found".into()));
        assert!(server.is_server());
        assert_eq!(server.server_message(), Some("Booking not found"));
    }

    #[test]
    fn server_error_without_text_has_no_message() {
        let err = ApiError::server(None);
        assert_eq!(err.server_message(), None);
        assert_eq!(err.to_string(), CODE_SERVER);
        assert_eq!(ApiError::request_failed("x").server_message(), None);
    }

    #[test]
    fn unit_token_reply_becomes_pass() {
        let envelope: TokenEnvelope = serde_json::from_value(json!({
            "success": true,
            "token": "xyz",
            "unit_number": "101",
            "full_code": "A-101",
            "expires_in": 2,
            "expires_at": "2026-01-01T10:00:00+00:00",
            "is_new": true
        }))
        .unwrap();
        let pass = envelope.into_pass().unwrap();
        assert_eq!(pass.full_code, "A-101");
        assert_eq!(pass.token, "xyz");
        assert_eq!(pass.expires_in_seconds(), 120);
        assert_eq!(pass.expires_in_label(), "2");
        assert!(pass.guest_link.is_none());
    }

    #[test]
    fn fractional_minutes_round_to_seconds() {
        let pass = VisitPass {
            full_code: "B-2".into(),
            token: "t".into(),
            expires_in_minutes: 1.5,
            guest_link: None,
        };
        assert_eq!(pass.expires_in_seconds(), 90);
        assert_eq!(pass.expires_in_label(), "1.5");
    }

    #[test]
    fn failure_reply_carries_server_text() {
        let envelope: TokenEnvelope =
            serde_json::from_value(json!({"success": false, "error": "Booking not found"}))
                .unwrap();
        let err = envelope.into_pass().unwrap_err();
        assert_eq!(err.server_message(), Some("Booking not found"));
    }

    #[test]
    fn success_without_token_is_a_decode_error() {
        let envelope: TokenEnvelope =
            serde_json::from_value(json!({"success": true, "expires_in": 15})).unwrap();
        assert_eq!(envelope.into_pass().unwrap_err().code, CODE_DECODE);
    }

    #[test]
    fn status_envelope_maps_to_result() {
        let ok: StatusEnvelope = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(ok.into_result().is_ok());
        let failed: StatusEnvelope =
            serde_json::from_value(json!({"success": false, "error": "No account"})).unwrap();
        assert_eq!(
            failed.into_result().unwrap_err().server_message(),
            Some("No account")
        );
        let bare: StatusEnvelope = serde_json::from_value(json!({"ok": true})).unwrap();
        assert!(bare.into_result().unwrap_err().is_server());
    }

    #[test]
    fn reset_request_serializes_email_only() {
        let body = serde_json::to_value(PasswordResetRequest { email: "a@b.com" }).unwrap();
        assert_eq!(body, json!({"email": "a@b.com"}));
    }
}
