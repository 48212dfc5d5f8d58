use crate::diag::Diagnostic;
use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

pub fn mirror_diagnostic(path: &Path, diag: &Diagnostic) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut f = OpenOptions::new().create(true).append(true).open(path)?;
    let line = json!({
        "ts": Utc::now().to_rfc3339(),
        "diagnostic": diag.to_string()
    });
    writeln!(f, "{}", line)?;
    Ok(())
}
