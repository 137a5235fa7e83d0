use std::process;

use log::{error, info};

use asgraph::pipeline::{PipelineConfig, PipelineRunner};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match PipelineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    match PipelineRunner::new(config).run() {
        Ok(report) => {
            info!(
                "Wrote {} nodes and {} links to {:?}",
                report.node_count, report.link_count, report.artifact_path
            );
        }
        Err(e) => {
            error!("Pipeline aborted: {}", e);
            process::exit(1);
        }
    }
}
