use std::path::Path;
use std::process::ExitCode;

use supreme_render::config::ChartSettings;
use supreme_render::services::chart_service;
use supreme_render::utils::{init_tracing, single_line_message};
use tracing::{error, info};

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        println!("Usage: chart_generator <json_data> <output_path>");
        return ExitCode::FAILURE;
    }

    let (json, output_path) = (&args[1], &args[2]);
    info!("📈 Chart requested, output: {}", output_path);

    match chart_service::generate_chart(json, Path::new(output_path), &ChartSettings::from_env()) {
        Ok(()) => {
            println!("SUCCESS:{}", output_path);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Chart generation failed: {}", e);
            println!("ERROR:{}", single_line_message(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}
