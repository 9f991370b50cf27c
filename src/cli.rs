use crate::report::ReportFormat;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "jvm-telemetry")]
#[command(author = "Anurag Ambuj")]
#[command(version)]
#[command(about = "Replay JVM telemetry samples into a paired GC timeline", long_about = None)]
pub struct Cli {
    #[arg(help = "JSON-lines file with one monitored sample per line")]
    pub input: String,

    #[arg(
        short = 'i',
        long,
        help = "Replay interval between samples (e.g. 0s, 10ms, 1s)",
        value_parser = parse_duration
    )]
    pub interval: Option<Duration>,

    #[arg(short = 'g', long, help = "Rows added to every column when the store is full")]
    pub growth_chunk: Option<usize>,

    #[arg(long, help = "Maximum heap size reported by the target JVM, in bytes")]
    pub max_heap: Option<i64>,

    #[arg(
        short = 'f',
        long,
        default_value_t = ReportFormat::Table,
        help = "Output format (table, json)"
    )]
    pub format: ReportFormat,

    #[arg(
        short = 'c',
        long,
        help = "Path to configuration file",
        env = "JVM_TELEMETRY_CONFIG"
    )]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn input_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.input).to_string())
    }
}

fn parse_duration(s: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(s)
}
