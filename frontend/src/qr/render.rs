use base64::{engine::general_purpose::STANDARD, Engine as _};
use qrcode::{render::svg, EcLevel, QrCode};

use crate::error::UiError;

pub const QR_SIZE: u32 = 200;
pub const QR_BACKGROUND: &str = "#FDEFD3";
pub const QR_FOREGROUND: &str = "#000000";

/// SVG markup for `data` at level M in the site colours.
pub fn render_svg(data: &str) -> Result<String, UiError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)
        .map_err(|e| UiError::Qr(e.to_string()))?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(QR_SIZE, QR_SIZE)
        .dark_color(svg::Color(QR_FOREGROUND))
        .light_color(svg::Color(QR_BACKGROUND))
        .build())
}

pub fn svg_to_data_url(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

pub fn render_data_url(data: &str) -> Result<String, UiError> {
    render_svg(data).map(|svg| svg_to_data_url(&svg))
}
