use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use jdwarn_log::ir::DEFAULT_CATEGORY;
use jdwarn_log::{ContinuationPolicy, ParserOptions, SeveritySummary, WarningParser, WarningRecord};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "jdwarn")]
#[command(about = "Extracts javadoc warnings from build logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a build log and print its javadoc warnings
    Parse {
        /// Path to the log file, or `-` for stdin
        #[arg(value_name = "FILE")]
        path: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Category stamped on every warning
        #[arg(long, default_value = DEFAULT_CATEGORY)]
        category: String,

        /// Drop a wrapped warning whose second line never arrives
        #[arg(long)]
        drop_truncated: bool,

        /// Also report warnings found inside test-runner output
        #[arg(long)]
        keep_test_output: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            path,
            format,
            category,
            drop_truncated,
            keep_test_output,
        } => {
            let continuation = if drop_truncated {
                ContinuationPolicy::Drop
            } else {
                ContinuationPolicy::EmitPartial
            };
            let options = ParserOptions::default()
                .with_category(category)
                .with_continuation(continuation)
                .with_noise_suppression(!keep_test_output);

            let records = read_records(&path, options)?;

            let mut stdout = io::stdout().lock();
            match format {
                Format::Json => writeln!(stdout, "{}", serde_json::to_string_pretty(&records)?)?,
                Format::Text => write_text(&mut stdout, &records)?,
            }
        }
    }
    Ok(())
}

/// Opens the log (or stdin) and parses it; the handle is closed on return.
fn read_records(path: &Path, options: ParserOptions) -> anyhow::Result<Vec<WarningRecord>> {
    let parser = WarningParser::with_options(options);
    let result = if path == Path::new("-") {
        parser.parse_reader(io::stdin().lock())
    } else {
        let file = File::open(path)
            .with_context(|| format!("could not read log {}", path.display()))?;
        parser.parse_reader(BufReader::new(file))
    };
    let records = result.with_context(|| format!("reading {}", path.display()))?;
    log::info!("{}: {} warnings", path.display(), records.len());
    Ok(records)
}

fn write_text(out: &mut impl Write, records: &[WarningRecord]) -> io::Result<()> {
    for record in records {
        if record.has_file() {
            write!(out, "{}:{}: ", record.file_path, record.line_number)?;
        }
        writeln!(out, "[{}] {}", record.severity, record.message)?;
    }
    let summary = SeveritySummary::from_records(records);
    writeln!(
        out,
        "{} warnings ({} high, {} normal, {} low)",
        summary.total(),
        summary.high,
        summary.normal,
        summary.low
    )
}
