use clap::{ArgAction, Parser};
use log::{Level, LevelFilter};
use smreport::{ReportError, ResultSet};

/// Reads every row of StorageManagerData using the connection string in
/// DATABASE_URL. Row contents are never printed.
#[derive(Parser)]
#[clap(name = "smreport", version)]
struct Opt {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[clap(long, short, action = ArgAction::Count)]
    verbose: u8,
}

impl Opt {
    fn level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// What gets logged for a run. Only counts are ever rendered, never values.
fn outcome(result: &Result<ResultSet, ReportError>) -> (Level, String) {
    match result {
        Ok(rows) => (
            Level::Info,
            format!(
                "Report complete: {} rows, {} columns",
                rows.len(),
                rows.columns.len()
            ),
        ),
        Err(e) => (Level::Error, e.report()),
    }
}

pub fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();

    // stdout stays empty; everything goes through the logger to stderr
    env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .filter_level(opt.level())
        .parse_default_env()
        .try_init()?;

    let (level, message) = outcome(&smreport::run());
    log::log!(level, "{}", message);

    Ok(())
}
