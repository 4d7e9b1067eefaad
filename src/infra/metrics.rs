// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// One CSV row per epoch, written to <checkpoint_dir>/metrics.csv.
// The file is recreated at the start of every run.
//
//   epoch,train_loss,eval_loss,eval_loss_total,patience_counter
//   1,3.124500,3.089200,61.784000,0
//   2,2.890100,2.954300,59.086000,0
//
// train_loss / eval_loss are per-batch averages; the total is
// what early stopping compares.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

const HEADER: &str = "epoch,train_loss,eval_loss,eval_loss_total,patience_counter";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// Starts at 1
    pub epoch: usize,
    pub train_loss: f64,
    pub eval_loss: f64,
    pub eval_loss_total: f64,
    /// Consecutive epochs without improvement, after this epoch
    pub patience_counter: usize,
}

impl EpochMetrics {
    fn to_csv_row(&self) -> String {
        format!(
            "{},{:.6},{:.6},{:.6},{}",
            self.epoch, self.train_loss, self.eval_loss, self.eval_loss_total, self.patience_counter,
        )
    }
}

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the directory if needed and start a fresh CSV.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let csv_path = dir.join("metrics.csv");
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "{HEADER}")?;

        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;
        writeln!(f, "{}", m.to_csv_row())?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, eval_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.eval_loss,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
