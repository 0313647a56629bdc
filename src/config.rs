//! Runtime settings for both renderers
//!
//! Canvas sizes, frame counts and timings are fixed. Only file locations can
//! be overridden, through the environment (a `.env` file is honoured by the
//! binaries).

use std::path::PathBuf;

pub const BANNER_WIDTH: u32 = 600;
pub const BANNER_HEIGHT: u32 = 240;
pub const BANNER_FRAMES: u32 = 30;
/// 100ms per frame = 10 FPS
pub const BANNER_FRAME_DELAY_MS: u32 = 100;
pub const BANNER_DEFAULT_OUTPUT: &str = "supreme_bot_banner.gif";

/// 12x7 inch figure at 150 dpi
pub const CHART_WIDTH: u32 = 1800;
pub const CHART_HEIGHT: u32 = 1050;

pub const DEFAULT_FONT_DIR: &str = "/usr/share/fonts/truetype/dejavu";

/// Candidate TrueType files for the text layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontPaths {
    pub regular: PathBuf,
    pub bold: PathBuf,
    pub mono: PathBuf,
}

impl FontPaths {
    /// DejaVu faces inside `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        FontPaths {
            regular: dir.join("DejaVuSans.ttf"),
            bold: dir.join("DejaVuSans-Bold.ttf"),
            mono: dir.join("DejaVuSansMono.ttf"),
        }
    }

    pub fn from_env() -> Self {
        let dir = std::env::var("RENDER_FONT_DIR").unwrap_or_else(|_| DEFAULT_FONT_DIR.to_string());
        Self::in_dir(dir)
    }
}

#[derive(Debug, Clone)]
pub struct BannerSettings {
    pub width: u32,
    pub height: u32,
    pub frames: u32,
    pub frame_delay_ms: u32,
    pub output_path: PathBuf,
    pub fonts: FontPaths,
}

impl BannerSettings {
    pub fn from_env() -> Self {
        let output_path = std::env::var("BANNER_OUTPUT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(BANNER_DEFAULT_OUTPUT));

        BannerSettings {
            output_path,
            fonts: FontPaths::from_env(),
            ..Self::default()
        }
    }
}

impl Default for BannerSettings {
    fn default() -> Self {
        BannerSettings {
            width: BANNER_WIDTH,
            height: BANNER_HEIGHT,
            frames: BANNER_FRAMES,
            frame_delay_ms: BANNER_FRAME_DELAY_MS,
            output_path: PathBuf::from(BANNER_DEFAULT_OUTPUT),
            fonts: FontPaths::in_dir(DEFAULT_FONT_DIR),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
    pub fonts: FontPaths,
}

impl ChartSettings {
    pub fn from_env() -> Self {
        ChartSettings {
            fonts: FontPaths::from_env(),
            ..Self::default()
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        ChartSettings {
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
            fonts: FontPaths::in_dir(DEFAULT_FONT_DIR),
        }
    }
}
