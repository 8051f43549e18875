//! Plot execution engine: outcome types and the serialized executor.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::Config;

pub mod python;

/// Result of one plot execution, propagated as a value rather than an
/// error: the pipeline narrates failures, it never crashes on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    Success(PathBuf),
    Failure(String),
}

/// Runs model-emitted plotting code in a bounded `python3` subprocess
/// and persists the resulting figure.
///
/// Executions are serialized behind a mutex: the plotting namespace has
/// process-global current-figure semantics, and interleaved runs would
/// cross-contaminate output.
pub struct PlotExecutor {
    output_dir: PathBuf,
    python_bin: String,
    timeout: Duration,
    memory_mb: u64,
    gate: Mutex<()>,
}

impl PlotExecutor {
    pub fn new(output_dir: PathBuf, python_bin: String, timeout: Duration, memory_mb: u64) -> Self {
        Self {
            output_dir,
            python_bin,
            timeout,
            memory_mb,
            gate: Mutex::new(()),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            cfg.plot_dir(),
            cfg.get("PYTHON_BIN").unwrap_or_else(|| "python3".into()),
            cfg.get_duration_secs("EXEC_TIMEOUT", 30),
            cfg.get_u64("EXEC_MEMORY_MB").unwrap_or(512),
        )
    }

    /// Execute `code` and capture one artifact. Every fault — directory
    /// creation, spawn, runtime exception, save, timeout — folds into
    /// `Failure(message)`.
    ///
    /// Artifact names have second granularity; two executions within
    /// the same second overwrite silently. Accepted limitation.
    pub async fn execute(&self, code: &str) -> ExecOutcome {
        let _serialized = self.gate.lock().await;

        if let Err(e) = tokio::fs::create_dir_all(&self.output_dir).await {
            return ExecOutcome::Failure(format!(
                "could not create plot directory {}: {}",
                self.output_dir.display(),
                e
            ));
        }

        let filename = format!("plot_{}.png", Local::now().format("%Y%m%d_%H%M%S"));
        let path = self.output_dir.join(filename);

        match python::run_plot(&self.python_bin, code, &path, self.timeout, self.memory_mb).await {
            Ok(()) => {
                if path.exists() {
                    info!(path = %path.display(), "plot artifact saved");
                    ExecOutcome::Success(path)
                } else {
                    ExecOutcome::Failure("no figure was saved".to_string())
                }
            }
            Err(e) => {
                warn!(error = %e, "plot execution failed");
                ExecOutcome::Failure(e.to_string())
            }
        }
    }
}
