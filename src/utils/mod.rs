pub mod annotation;
pub mod errors;
pub mod fonts;

use plotters::coord::Shift;
use plotters::prelude::{BitMapBackend, DrawingArea};

pub use annotation::Annotation;
pub use errors::{single_line_message, RenderError};
pub use fonts::{load_fonts, probe_fonts, FontSource};

/// Drawing area over an in-memory RGB buffer
pub type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Install the log subscriber shared by both binaries
///
/// Logs go to stderr: stdout carries the user-facing output.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("supreme_render=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
