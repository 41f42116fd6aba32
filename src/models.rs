use serde::{Deserialize, Serialize};

/// JSON body for the render and short-url endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    pub chart: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_pixel_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ShortUrlResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub url: Option<String>,
}

/// Mime type for a data uri of the given output format.
pub fn mime_type(format: &str) -> &'static str {
    match format.to_ascii_lowercase().as_str() {
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "jpg" | "jpeg" => "image/jpeg",
        "pdf" => "application/pdf",
        _ => "image/png",
    }
}
