use std::path::PathBuf;

use thiserror::Error;

/// Unified application error for the demo binary.
///
/// The alert queue itself never fails; these cover start-up and
/// script loading.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Could not read alert script {path}: {source}")]
    ScriptRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid alert script: {0}")]
    ScriptFormat(#[from] serde_json::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}
