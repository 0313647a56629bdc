use std::path::{Path, PathBuf};

use plotters::style::{register_font, FontStyle};
use tracing::{debug, info, warn};

use super::errors::RenderError;
use crate::config::FontPaths;

/// Family names looked up by `("sans-serif", size).into_font()` and friends
pub const SANS_FAMILY: &str = "sans-serif";
pub const MONO_FAMILY: &str = "monospace";

static BUILTIN_SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static BUILTIN_MONO: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");

/// Where the faces registered with plotters came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// The configured font files; holds the regular face's path
    System(PathBuf),
    /// The faces compiled into the binary
    BuiltIn,
}

/// Probe the configured font files and register them with plotters
///
/// Returns the regular face's path, or `None` when it is missing or not a
/// font. Missing bold or mono faces are substituted with the regular one.
pub fn probe_fonts(paths: &FontPaths) -> Option<PathBuf> {
    let regular = read_face(&paths.regular)?;
    if register_font(SANS_FAMILY, FontStyle::Normal, regular).is_err() {
        warn!("Font {} is not a valid TrueType face", paths.regular.display());
        return None;
    }

    let bold = read_face(&paths.bold).filter(|bytes| register_font(SANS_FAMILY, FontStyle::Bold, *bytes).is_ok());
    if bold.is_none() {
        register_font(SANS_FAMILY, FontStyle::Bold, regular).ok()?;
    }
    let mono = read_face(&paths.mono).filter(|bytes| register_font(MONO_FAMILY, FontStyle::Normal, *bytes).is_ok());
    if mono.is_none() {
        register_font(MONO_FAMILY, FontStyle::Normal, regular).ok()?;
    }

    Some(paths.regular.clone())
}

/// Register the built-in faces for every family and style we draw with
fn register_builtin() -> Result<(), RenderError> {
    let faces = [
        (SANS_FAMILY, FontStyle::Normal, BUILTIN_SANS),
        (SANS_FAMILY, FontStyle::Bold, BUILTIN_SANS),
        (MONO_FAMILY, FontStyle::Normal, BUILTIN_MONO),
    ];
    for (family, style, bytes) in faces {
        register_font(family, style, bytes)
            .map_err(|_| RenderError::Draw(format!("Failed to load built-in {} font", family)))?;
    }
    Ok(())
}

/// Make text drawable: configured fonts when the probe finds them,
/// otherwise the built-in faces
pub fn load_fonts(paths: &FontPaths) -> Result<FontSource, RenderError> {
    match probe_fonts(paths) {
        Some(regular) => {
            debug!("Using fonts from {}", regular.display());
            Ok(FontSource::System(regular))
        }
        None => {
            register_builtin()?;
            info!("Configured fonts not found, using the built-in faces");
            Ok(FontSource::BuiltIn)
        }
    }
}

fn read_face(path: &Path) -> Option<&'static [u8]> {
    match std::fs::read(path) {
        // The plotters font registry keeps faces for the life of the process
        Ok(bytes) => Some(Box::leak(bytes.into_boxed_slice())),
        Err(e) => {
            debug!("Font {} unavailable: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotters::style::{FontDesc, FontFamily};

    fn temp_font_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("supreme_fonts_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_regular_face() {
        let paths = FontPaths::in_dir("/nonexistent/font/dir");
        assert_eq!(probe_fonts(&paths), None);
        assert_eq!(load_fonts(&paths).unwrap(), FontSource::BuiltIn);
    }

    #[test]
    fn test_invalid_regular_face() {
        let dir = temp_font_dir("invalid");
        std::fs::write(dir.join("DejaVuSans.ttf"), b"not a font").unwrap();

        let paths = FontPaths::in_dir(&dir);
        assert_eq!(probe_fonts(&paths), None);
        assert_eq!(load_fonts(&paths).unwrap(), FontSource::BuiltIn);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_regular_face_alone_is_enough() {
        let dir = temp_font_dir("regular");
        std::fs::write(dir.join("DejaVuSans.ttf"), BUILTIN_SANS).unwrap();

        let paths = FontPaths::in_dir(&dir);
        assert_eq!(load_fonts(&paths).unwrap(), FontSource::System(paths.regular.clone()));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_builtin_faces_measure_text() {
        load_fonts(&FontPaths::in_dir("/nonexistent/font/dir")).unwrap();

        for (family, style) in [
            (FontFamily::SansSerif, FontStyle::Normal),
            (FontFamily::SansSerif, FontStyle::Bold),
            (FontFamily::Monospace, FontStyle::Normal),
        ] {
            let (w, h) = FontDesc::new(family, 20.0, style).box_size("WL 100").unwrap();
            assert!(w > 0 && h > 0);
        }
    }
}
