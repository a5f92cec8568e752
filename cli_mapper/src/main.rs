//! Batch map renderer: discovers downloaded snapshot files, reconstructs the
//! per-turn timeline, and writes one `map_<turn>.png` per turn.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing::{info, warn};

use core_recon::{drive, load_recon_config, ReconConfig, TracingSink};
use map_render::{MapRenderer, PngTurnWriter, RenderConfig};
use report_schema::{GameState, Report};

#[derive(Parser, Debug)]
#[command(author, version, about = "Starveil map renderer", long_about = None)]
struct Cli {
    /// Directory containing downloaded gamestate_<player>_<tick>.json files.
    #[arg(long)]
    download_dir: PathBuf,
    /// Output directory for rendered maps (defaults to the download dir).
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Reconstruction config file (falls back to STARVEIL_RECON_CONFIG, then
    /// builtin values).
    #[arg(long)]
    recon_config: Option<PathBuf>,
    /// Presentation config file.
    #[arg(long)]
    render_config: Option<PathBuf>,
    /// Override the ticks-per-turn divisor.
    #[arg(long)]
    ticks_per_turn: Option<u32>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .init();

    let cli = Cli::parse();

    let mut recon_config = match &cli.recon_config {
        Some(path) => ReconConfig::from_file(path)?,
        None => load_recon_config(),
    };
    if let Some(ticks) = cli.ticks_per_turn {
        if ticks == 0 {
            return Err(eyre!("--ticks-per-turn must be at least 1"));
        }
        recon_config.ticks_per_turn = ticks;
    }

    let render_config = match &cli.render_config {
        Some(path) => RenderConfig::from_file(path)?,
        None => RenderConfig::default(),
    };

    let reports = collect_reports(&cli.download_dir)?;
    if reports.is_empty() {
        warn!(
            dir = %cli.download_dir.display(),
            "no decodable snapshot files found"
        );
        return Ok(());
    }

    let out_dir = cli.out_dir.unwrap_or_else(|| cli.download_dir.clone());
    fs::create_dir_all(&out_dir)?;

    let mut sink = TracingSink;
    let mut writer = PngTurnWriter::new(MapRenderer::new(render_config), out_dir);
    let metrics = drive(reports, &recon_config, &mut sink, &mut writer)?;

    info!(
        turns = metrics.turns,
        reports = metrics.reports,
        reports_skipped = metrics.reports_skipped,
        star_conflicts = metrics.star_conflicts,
        stars_carried = metrics.stars_carried,
        "run complete"
    );
    Ok(())
}

/// Gather every decodable snapshot report under `dir`.
///
/// Files that fail to parse are skipped with a warning; one bad download must
/// not sink the whole batch. The file list is sorted so first-writer-wins
/// merge decisions are reproducible across runs.
fn collect_reports(dir: &Path) -> Result<Vec<Report>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_snapshot_file(path))
        .collect();
    paths.sort();

    let mut reports = Vec::with_capacity(paths.len());
    for path in paths {
        match GameState::from_file(&path) {
            Ok(state) => reports.push(state.report),
            Err(err) => {
                warn!(file = %path.display(), error = %err, "skipping undecodable snapshot");
            }
        }
    }
    Ok(reports)
}

fn is_snapshot_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with("gamestate_") && name.ends_with(".json"))
        .unwrap_or(false)
}
