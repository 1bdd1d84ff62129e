use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};

/// Extract the text layer of a PDF with `pdftotext`. Returns the raw text
/// with NUL bytes removed and form feeds folded into newlines; the caller
/// decides what an empty result means.
pub fn extract_text(pdf_path: &Path) -> Result<String> {
    let output = Command::new("pdftotext")
        .arg("-enc")
        .arg("UTF-8")
        .arg(pdf_path)
        .arg("-")
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    Ok(raw.replace('\u{0000}', "").replace('\u{000C}', "\n"))
}
