use std::process::ExitCode;

use supreme_render::config::BannerSettings;
use supreme_render::services::banner_service::{self, BannerProgress};
use supreme_render::utils::init_tracing;
use tracing::{error, info};

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    init_tracing();

    let settings = BannerSettings::from_env();
    info!(
        "Rendering {} frames at {}x{} to {}",
        settings.frames,
        settings.width,
        settings.height,
        settings.output_path.display()
    );

    println!("Generating animated banner frames...");
    let result = banner_service::create_banner(&settings, |event| match event {
        BannerProgress::Frame { number, total } => println!("Frame {}/{}", number, total),
        BannerProgress::Encoding => println!("Saving animated GIF..."),
    });

    match result {
        Ok(path) => {
            println!("✅ Animated banner created: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Banner generation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
