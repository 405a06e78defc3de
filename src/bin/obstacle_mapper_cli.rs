use anyhow::{Context, Error, Result};
use clap::{Parser, Subcommand};
use obstacle_mapper::config::MapperConfig;
use obstacle_mapper::estimation::{ObstacleMapper, TrajectoryReport};
use obstacle_mapper::logging::{init_logging, LogLevel};
use obstacle_mapper::telemetry::{
    replay_backup, store, BackupRecorder, TelemetryBatch, TelemetryReader,
};
use obstacle_mapper::MapperCore;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::io::BufReader;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "obstacle_mapper_cli")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level (overridden by RUST_LOG)
    #[arg(short = 'l', long = "log-level", default_value = "info")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read telemetry lines from stdin, keep a raw backup, save sample CSVs
    Listen {
        #[arg(short = 'b', long = "backup", default_value = "backup.txt")]
        backup: PathBuf,
        #[arg(short = 'o', long = "out-dir", default_value = ".")]
        out_dir: PathBuf,
    },
    /// Rebuild the sample CSVs from a backup file
    Replay {
        #[arg(short = 'b', long = "backup", default_value = "backup.txt")]
        backup: PathBuf,
        #[arg(short = 'o', long = "out-dir", default_value = ".")]
        out_dir: PathBuf,
    },
    /// Estimate obstacle positions from the sample CSVs
    Estimate {
        #[arg(long = "path", default_value = "path_data.csv")]
        path: PathBuf,
        #[arg(long = "obs", default_value = "obs_data.csv")]
        obs: PathBuf,
        #[arg(short = 'o', long = "out-dir", default_value = ".")]
        out_dir: PathBuf,
        #[arg(long = "origin-easting", requires = "origin_northing")]
        origin_easting: Option<f64>,
        #[arg(long = "origin-northing", requires = "origin_easting")]
        origin_northing: Option<f64>,
        #[arg(long = "zero-fix-epsilon")]
        zero_fix_epsilon: Option<f64>,
    },
}

fn save_samples(out_dir: &Path, batch: &TelemetryBatch) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let path_csv = out_dir.join("path_data.csv");
    let obs_csv = out_dir.join("obs_data.csv");
    store::write_poses(&path_csv, &batch.poses)
        .with_context(|| format!("Failed to write {}", path_csv.display()))?;
    store::write_detections(&obs_csv, &batch.detections)
        .with_context(|| format!("Failed to write {}", obs_csv.display()))?;

    info!(
        "{} records saved to {} and {}",
        batch.len(),
        path_csv.display(),
        obs_csv.display()
    );
    Ok(())
}

async fn listen(backup: &Path, out_dir: &Path) -> Result<()> {
    let mut core = MapperCore::new();
    core.register(BackupRecorder::new(backup));
    core.init().map_err(Error::msg)?;

    info!("Listening on stdin...");
    let mut reader = TelemetryReader::new(BufReader::new(tokio::io::stdin()));
    let stop = async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Stopped by user");
        }
    };
    let batch = reader.read_batch_until(core.backup_recorder_mut(), stop).await;

    // Close the backup even when the stream failed
    core.shutdown().map_err(Error::msg)?;
    let batch = batch.context("Failed to read telemetry")?;
    if batch.is_empty() {
        warn!("No PATH or OBS records received");
    }

    save_samples(out_dir, &batch)?;
    info!("Backup saved to {}", backup.display());
    Ok(())
}

async fn replay(backup: &Path, out_dir: &Path) -> Result<()> {
    let batch = replay_backup(backup)
        .await
        .with_context(|| format!("Failed to replay {}", backup.display()))?;
    save_samples(out_dir, &batch)
}

fn write_report(out_dir: &Path, report: &TrajectoryReport) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let estimated = out_dir.join("estimated_data.csv");
    store::write_estimates(&estimated, &report.obstacles)
        .with_context(|| format!("Failed to write {}", estimated.display()))?;

    let estimated_relative = out_dir.join("estimated_relative.csv");
    store::write_estimates(&estimated_relative, &report.relative_obstacles)
        .with_context(|| format!("Failed to write {}", estimated_relative.display()))?;

    let path_absolute = out_dir.join("path_absolute.csv");
    store::write_path(&path_absolute, &report.path, &report.path_headings)
        .with_context(|| format!("Failed to write {}", path_absolute.display()))?;

    let path_relative = out_dir.join("path_relative.csv");
    store::write_path(&path_relative, &report.relative_path, &report.path_headings)
        .with_context(|| format!("Failed to write {}", path_relative.display()))?;

    info!("Estimates saved to {}", estimated.display());
    Ok(())
}

fn estimate(
    path: &Path,
    obs: &Path,
    out_dir: &Path,
    params: &HashMap<String, f64>,
) -> Result<()> {
    let mut config = MapperConfig::new();
    config.configure(params).map_err(Error::msg)?;

    let batch = TelemetryBatch {
        poses: store::read_poses(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        detections: store::read_detections(obs)
            .with_context(|| format!("Failed to read {}", obs.display()))?,
    };

    let report = ObstacleMapper::new(config).run(batch)?;

    for skipped in &report.skipped {
        warn!(
            "Skipped {} #{}: {}",
            skipped.kind, skipped.index, skipped.error
        );
    }
    info!(
        "Zone {}, origin ({:.3}, {:.3}), {} path points, {} obstacles",
        report.zone,
        report.origin.easting,
        report.origin.northing,
        report.path.len(),
        report.obstacles.len()
    );

    write_report(out_dir, &report)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?;
    let result = runtime.block_on(run(args.command));

    // A pending stdin read sits on a blocking thread that cannot be
    // cancelled; do not wait for it after Ctrl+C.
    runtime.shutdown_background();
    result
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Listen { backup, out_dir } => listen(&backup, &out_dir).await,
        Command::Replay { backup, out_dir } => replay(&backup, &out_dir).await,
        Command::Estimate {
            path,
            obs,
            out_dir,
            origin_easting,
            origin_northing,
            zero_fix_epsilon,
        } => {
            let mut params = HashMap::new();
            if let Some(easting) = origin_easting {
                params.insert("origin_easting".to_string(), easting);
            }
            if let Some(northing) = origin_northing {
                params.insert("origin_northing".to_string(), northing);
            }
            if let Some(epsilon) = zero_fix_epsilon {
                params.insert("zero_fix_epsilon".to_string(), epsilon);
            }
            estimate(&path, &obs, &out_dir, &params)
        }
    }
}
