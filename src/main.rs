use std::error::Error;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use anylog::{open_capture, LogRecord, ReplayError};

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Replays a raw AnyLog CAN capture as a readable frame report"
)]
struct Cli {
    /// Capture file written by the logger
    #[arg(value_name = "CAPTURE", default_value = "ANYCAN.RAW")]
    capture: PathBuf,

    /// Print the undecoded bytes of every record before its decoded line
    #[arg(long)]
    raw: bool,

    /// Diagnostic log level on stderr (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

/// Initialize stderr logging with an optional level override.
/// Falls back to WARN if the level is absent or invalid.
fn init_logging(log_level: Option<&str>) {
    let level = log_level
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    FmtSubscriber::builder()
        .with_target(false)
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn write_raw(out: &mut impl Write, record: &LogRecord) -> io::Result<()> {
    write!(out, "RAW data:")?;

    for byte in record.as_bytes() {
        write!(out, " {:02x}", byte)?;
    }

    writeln!(out)
}

fn run(cli: &Cli) -> Result<(), ReplayError> {
    let mut decoder = open_capture(&cli.capture)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    while let Some(record) = decoder.next_record()? {
        if cli.raw {
            write_raw(&mut out, &record).map_err(ReplayError::Write)?;
        }

        writeln!(out, "{}", record).map_err(ReplayError::Write)?;
    }

    out.flush().map_err(ReplayError::Write)?;

    if decoder.is_truncated() {
        warn!("capture ended mid-record; dropped a partial trailing record");
    }

    info!(
        "decoded {} frames from {}",
        decoder.frames(),
        cli.capture.display()
    );

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.log_level.as_deref());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);

            let mut cause = err.source();
            while let Some(source) = cause {
                error!("caused by: {}", source);
                cause = source.source();
            }

            ExitCode::FAILURE
        }
    }
}
