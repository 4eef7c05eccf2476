use anyhow::Context;
use clap::Parser;
use gui_bridge::bridge::{gui_bind_address, GuiBridge};
use gui_bridge::model::VisualizationModel;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Replays synthetic camera sessions through the barcode scanner core")]
struct Args {
    /// Append a summary of the run to tools/data/scan_runs.log
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 40)]
    frames: usize,
    #[arg(long, default_value_t = 100)]
    frame_interval_ms: u64,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Use the portrait camera profile
    #[arg(long, default_value_t = false)]
    portrait: bool,
    /// Write the tally CSV export to this file
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Keep the HTTP bridge alive to serve the session snapshot
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.frames, args.frame_interval_ms, args.seed, args.portrait)
    };
    if args.csv.is_some() {
        workflow_config.csv_path = args.csv;
    }

    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime for the scan session")?;

    let runner = Runner::new(workflow_config.clone());
    let result = runtime.block_on(runner.execute())?;

    println!(
        "Scan session -> detections {}, accepted {}, distinct codes {}, duplicates {}, low confidence {}",
        result.metrics.detections,
        result.accepted,
        result.rows.len(),
        result.metrics.rejected_duplicate,
        result.metrics.rejected_low_confidence
    );
    if result.exported {
        if let Some(path) = workflow_config.csv_path.as_ref() {
            println!("Tally exported to {}", path.display());
        }
    }

    if args.offline {
        let report = format!(
            "seed={} detections={} accepted={} codes={} duplicates={} low_confidence={} playback_failures={}\n",
            workflow_config.generator.seed,
            result.metrics.detections,
            result.accepted,
            result.rows.len(),
            result.metrics.rejected_duplicate,
            result.metrics.rejected_low_confidence,
            result.metrics.playback_failures
        );
        let report_path = PathBuf::from("tools/data/scan_runs.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&report_path)
            .with_context(|| format!("opening {}", report_path.display()))?;
        file.write_all(report.as_bytes())?;
    }

    if args.serve {
        let gui_bridge = GuiBridge::new(gui_bind_address());
        gui_bridge.publish(&VisualizationModel::from_result(&result));
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
