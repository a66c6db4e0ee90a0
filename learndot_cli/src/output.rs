use anyhow::Result;
use learndot_api::{ApiResponse, ResponseBody};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// Single-line JSON.
    Compact,
}

pub fn render_json<T: Serialize>(data: &T, format: &OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::Compact => serde_json::to_string(data)?,
    };
    Ok(rendered)
}

pub fn print_json<T: Serialize>(data: &T, format: &OutputFormat) -> Result<()> {
    println!("{}", render_json(data, format)?);
    Ok(())
}

/// Renders a response body; non-JSON bodies are shown as text.
pub fn render_response(resp: &ApiResponse, format: &OutputFormat) -> Result<String> {
    match &resp.body {
        ResponseBody::Json(value) => render_json(value, format),
        ResponseBody::Raw(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

pub fn print_response(resp: &ApiResponse, format: &OutputFormat) -> Result<()> {
    println!("{}", render_response(resp, format)?);
    Ok(())
}
