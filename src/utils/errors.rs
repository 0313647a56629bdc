use thiserror::Error;

/// Rendering errors shared by the banner and chart pipelines
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Draw(String),
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Wrap a plotters drawing failure with a short description of the step
    pub fn draw(step: &str, err: impl std::fmt::Display) -> Self {
        RenderError::Draw(format!("Failed to {}: {}", step, err))
    }
}

/// Collapse a multi-line error into the single line printed after `ERROR:`
///
/// Callers parse stdout line by line, so embedded newlines would split the
/// message across several records:
/// "missing field `price`\n at line 1" -> "missing field `price` at line 1"
pub fn single_line_message(error_msg: &str) -> String {
    error_msg
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
