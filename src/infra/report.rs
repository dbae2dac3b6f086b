// ============================================================
// Layer 6 — Loss Report Logger
// ============================================================
// Appends one CSV row per loss evaluation so successive runs can be
// compared or plotted.
//
//   loss,p_loss,cos_loss,sin_loss,width_loss
//   0.912345,0.301200,0.250000,0.200000,0.161145
//
// The header is written only when the file is created.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::ml::loss::LossSummary;

const HEADER: &str = "loss,p_loss,cos_loss,sin_loss,width_loss";

pub struct LossReportLogger {
    csv_path: PathBuf,
}

impl LossReportLogger {
    pub fn new(csv_path: impl Into<PathBuf>) -> Result<Self> {
        let csv_path = csv_path.into();

        if let Some(dir) = csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created loss report: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, s: &LossSummary) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{:.6},{:.6},{:.6},{:.6},{:.6}",
            s.loss, s.p_loss, s.cos_loss, s.sin_loss, s.width_loss,
        )?;
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
