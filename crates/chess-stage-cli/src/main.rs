//! Command-line front end for the staging pipeline, operating on scene
//! snapshots (JSON) instead of a live 3D application.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use chess_stage::{
    diagnose, init_with_level, BatchOptions, PlacementPolicy, SnapshotScene, Stage, StageConfig,
    Viewpoint,
};

#[derive(Parser)]
#[command(name = "chess-stage", version, about = "Stage chess positions on a calibrated scene")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum ViewArg {
    White,
    #[default]
    Black,
}

impl From<ViewArg> for Viewpoint {
    fn from(view: ViewArg) -> Viewpoint {
        match view {
            ViewArg::White => Viewpoint::White,
            ViewArg::Black => Viewpoint::Black,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum PolicyArg {
    #[default]
    Displacement,
    Pool,
}

impl From<PolicyArg> for PlacementPolicy {
    fn from(policy: PolicyArg) -> PlacementPolicy {
        match policy {
            PolicyArg::Displacement => PlacementPolicy::Displacement,
            PolicyArg::Pool => PlacementPolicy::Pool,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Stage one position and render it.
    Place {
        /// Scene snapshot to operate on.
        #[arg(long)]
        scene: PathBuf,
        /// Position notation (only the placement field is used).
        #[arg(long)]
        fen: String,
        #[arg(long, value_enum, default_value_t)]
        view: ViewArg,
        #[arg(long, value_enum, default_value_t)]
        policy: PolicyArg,
        /// Output name; ".png" is appended when missing.
        #[arg(long, default_value = "render_output")]
        output: String,
        /// Write the mutated snapshot back to this path.
        #[arg(long)]
        save_scene: Option<PathBuf>,
    },
    /// Render one frame per distinct notation from a tabular input file.
    Batch {
        #[arg(long)]
        scene: PathBuf,
        /// Input file: CSV with a header row, or one notation per line.
        #[arg(long)]
        input: PathBuf,
        /// CSV column holding the notations.
        #[arg(long, default_value = "fen")]
        column: String,
        #[arg(long, default_value_t = 2000)]
        limit: usize,
        #[arg(long, default_value = "renders")]
        output_dir: PathBuf,
        #[arg(long, default_value = "synthetic")]
        prefix: String,
        #[arg(long, value_enum, default_value_t = PolicyArg::Pool)]
        policy: PolicyArg,
        #[arg(long, value_enum, default_value_t)]
        view: ViewArg,
    },
    /// Print board measurements for a scene snapshot.
    Diagnose {
        #[arg(long)]
        scene: PathBuf,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    init_with_level(level)?;

    match cli.command {
        Command::Place {
            scene,
            fen,
            view,
            policy,
            output,
            save_scene,
        } => {
            let snapshot = SnapshotScene::load_json(&scene)?;
            let config = StageConfig {
                policy: policy.into(),
                ..StageConfig::default()
            };
            let mut stage = Stage::new(snapshot, config);
            let outcome = stage.render_position(&fen, view.into(), &output)?;

            println!("rendered {}", outcome.output_path.display());
            println!("placed {}, hidden {}", outcome.placed, outcome.hidden);
            for (square, piece) in &outcome.unfulfilled {
                println!("unfulfilled: {piece} on {square}");
            }
            for (id, err) in &outcome.failures {
                println!("failed: {id}: {err}");
            }
            if let Some(path) = save_scene {
                stage.into_scene().write_json(path)?;
            }
            Ok(())
        }
        Command::Batch {
            scene,
            input,
            column,
            limit,
            output_dir,
            prefix,
            policy,
            view,
        } => {
            let snapshot = SnapshotScene::load_json(&scene)?;
            let notations = read_notations(&input, &column)?;
            fs::create_dir_all(&output_dir)?;

            // render_batch calibrates once up front and reuses the geometry
            // for every frame of the run.
            let config = StageConfig {
                policy: policy.into(),
                ..StageConfig::default()
            };
            let mut stage = Stage::new(snapshot, config);

            let options = BatchOptions {
                output_dir,
                limit,
                file_prefix: prefix,
                view: view.into(),
            };
            let report = stage.render_batch(notations, &options)?;
            println!(
                "rendered {} frames ({} duplicates, {} malformed, {} unfulfilled targets)",
                report.rendered,
                report.skipped_duplicates,
                report.malformed,
                report.unfulfilled_total
            );
            Ok(())
        }
        Command::Diagnose { scene } => {
            let snapshot = SnapshotScene::load_json(&scene)?;
            let diagnostic = diagnose(&snapshot, &Default::default())?;
            println!("{}", serde_json::to_string_pretty(&diagnostic)?);
            Ok(())
        }
    }
}

/// Read notations from a CSV file with a header row containing `column`, or
/// from a plain one-notation-per-line file. Notation fields never contain
/// commas, so no quoting support is needed.
fn read_notations(path: &Path, column: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let raw = fs::read_to_string(path)?;
    let mut lines = raw.lines();
    let Some(first) = lines.next() else {
        return Ok(Vec::new());
    };

    let notations = if let Some(idx) = first.split(',').position(|h| h.trim() == column) {
        lines
            .filter_map(|line| line.split(',').nth(idx))
            .map(|field| field.trim().to_string())
            .filter(|field| !field.is_empty())
            .collect()
    } else {
        std::iter::once(first)
            .chain(lines)
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    };
    Ok(notations)
}
