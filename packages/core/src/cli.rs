use std::path::PathBuf;

use clap::Parser;

/// Alert queue demo CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "alert-queue",
    version,
    about = "Show a batch of modal alerts one at a time through the alert queue"
)]
pub struct Cli {
    /// Titles of simple alerts to queue, in order
    pub titles: Vec<String>,

    /// JSON file describing the alerts to queue
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Pause between a dismissal and the next alert, in milliseconds
    #[arg(long)]
    pub dismiss_delay_ms: Option<u64>,

    /// How long each alert stays up before the renderer presses it
    #[arg(long)]
    pub hold_ms: Option<u64>,

    /// Print Prometheus metrics once the queue is drained
    #[arg(long)]
    pub print_metrics: bool,

    /// Log every queue transition
    #[arg(short, long)]
    pub verbose: bool,
}
