//! ppe_check - run recorded detector frames through the compliance engine.
//!
//! Reads one JSON `RawFrame` per line and writes one `FrameSnapshot` per
//! processed frame. Frames without a tracked person, or from cameras outside
//! the configured allow-list, produce no output.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use ppe_compliance::config::EngineSettings;
use ppe_compliance::ingest::parse_raw_frame;
use ppe_compliance::{ComplianceEngine, FrameFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Check PPE compliance of recorded detector frames")]
struct Args {
    /// JSON-lines file of detector frames, or '-' for stdin.
    #[arg(long, default_value = "-")]
    input: String,

    /// Output file for snapshots (defaults to stdout).
    #[arg(long)]
    output: Option<PathBuf>,

    /// TOML settings file (overrides PPE_CONFIG).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print each snapshot instead of one line per frame.
    #[arg(long)]
    pretty: bool,

    /// Stop at the first malformed line instead of skipping it.
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Default)]
struct Summary {
    lines: usize,
    malformed: usize,
    skipped: usize,
    snapshots: usize,
    violations: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let settings = match args.config.as_deref() {
        Some(path) => EngineSettings::load_from(Some(path))?,
        None => EngineSettings::load()?,
    };
    let engine = ComplianceEngine::new(settings.containment_margin);
    let filter = FrameFilter::new(settings.min_confidence);

    log::info!("ppe_check starting");
    log::info!("  Containment margin: {}", settings.containment_margin);
    log::info!("  Min confidence: {}", settings.min_confidence);
    log::info!(
        "  Cameras: {}",
        if settings.cameras.is_empty() {
            "all".to_string()
        } else {
            settings.cameras.join(", ")
        }
    );

    let reader: Box<dyn BufRead> = if args.input == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(&args.input)
            .with_context(|| format!("failed to open input {}", args.input))?;
        Box::new(BufReader::new(file))
    };
    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("failed to create output {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let mut summary = Summary::default();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line.context("failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }
        summary.lines += 1;

        let raw = match parse_raw_frame(line.as_bytes()) {
            Ok(raw) => raw,
            Err(e) if args.strict => return Err(anyhow!("line {}: {}", lineno + 1, e)),
            Err(e) => {
                log::warn!("Skipping line {}: {}", lineno + 1, e);
                summary.malformed += 1;
                continue;
            }
        };
        if !settings.allows_camera(&raw.camera_id) {
            summary.skipped += 1;
            continue;
        }
        let Some(prepared) = filter.prepare(raw) else {
            summary.skipped += 1;
            continue;
        };

        let snapshot = engine.process_prepared(prepared);
        summary.snapshots += 1;
        summary.violations += snapshot.violation_count();

        let json = if args.pretty {
            snapshot.to_json_pretty()?
        } else {
            snapshot.to_json()?
        };
        writeln!(writer, "{}", json).context("failed to write snapshot")?;
    }
    writer.flush().context("failed to flush output")?;

    log::info!(
        "Processed {} frame(s): {} snapshot(s), {} skipped, {} malformed, {} violation(s)",
        summary.lines,
        summary.snapshots,
        summary.skipped,
        summary.malformed,
        summary.violations
    );
    Ok(())
}
