use anyhow::Context;
use clap::Parser;
use magic_identify::logging::{init_tracing, init_tracing_json};
use magic_identify::{Classification, IdentifyConfig, IdentifyReport, MagicIdentify};
use rayon::prelude::*;
use std::io::{self, Write};
use std::path::PathBuf;

/// magic-identify tries hard to find descriptions for a file.
///
/// It combines a content-signature sniffer with interpreter directive
/// inspection, falling back to keyword scoring for headerless shell scripts.
#[derive(Parser, Debug)]
#[command(name = "magic-identify")]
#[command(author, version, about, after_help = "Example usage: magic-identify FILE ...")]
struct Args {
    /// Logging verbosity (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Prefer identify over magic
    #[arg(short = 'i', long)]
    prefer_identify: bool,

    /// Trust magic unconditionally
    #[arg(short = 'm', long)]
    prefer_magic: bool,

    /// Simplify output to just the best mime-type
    #[arg(short, long)]
    quiet: bool,

    /// Print one JSON report per file
    #[arg(long, conflicts_with = "quiet")]
    json: bool,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input files to identify
    input_files: Vec<PathBuf>,
}

struct Outcome {
    report: IdentifyReport,
    magic: Option<Classification>,
    identify: Option<Classification>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.log_json {
        init_tracing_json(&args.log_level);
    } else {
        init_tracing(&args.log_level);
    }

    let mut config = match &args.config {
        Some(path) => IdentifyConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => IdentifyConfig::default(),
    };
    config.prefer_identify |= args.prefer_identify;
    config.prefer_magic |= args.prefer_magic;

    let mi = MagicIdentify::new(config);
    let verbose = !args.quiet && !args.json;

    let outcomes: Vec<Outcome> = args
        .input_files
        .par_iter()
        .map(|path| Outcome {
            report: mi.identify_report(path),
            magic: verbose.then(|| mi.classify_by_signature(path)),
            identify: verbose.then(|| mi.classify_by_interpreter(path)),
        })
        .collect();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for outcome in outcomes {
        if args.json {
            writeln!(out, "{}", serde_json::to_string(&outcome.report)?)?;
        } else if args.quiet {
            writeln!(out, "{}", outcome.report.result.mime)?;
        } else {
            writeln!(out, "{}: {}", outcome.report.path, outcome.report.result)?;
            if let Some(magic) = outcome.magic {
                writeln!(out, "  using magic:    {}", magic)?;
            }
            if let Some(identify) = outcome.identify {
                writeln!(out, "  using identify: {}", identify)?;
            }
        }
    }

    Ok(())
}
