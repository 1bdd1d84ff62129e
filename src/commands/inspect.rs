use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::InspectArgs;
use crate::extract::Pipeline;
use crate::model::{DisplaySummary, DocumentType, ExtractionResult, InspectReport};
use crate::pdftext;

pub fn run(args: InspectArgs) -> Result<()> {
    let input = &args.input;
    if !input.exists() {
        bail!("input file not found: {}", input.display());
    }

    let pipeline = Pipeline::new()?;
    let forced = args.document_type.forced();

    let result = match pdftext::extract_text(input) {
        Ok(text) => pipeline.process(&text, forced),
        Err(err) => {
            warn!(error = %err, "text extraction failed");
            ExtractionResult::failed(
                forced.unwrap_or(DocumentType::ConsentForm),
                format!("PDF parsing error: {err}"),
            )
        }
    };

    let report = InspectReport {
        document_type: result.document_type,
        success: result.success,
        summary: DisplaySummary::from(&result.patient),
        warnings: result.warnings,
    };

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&report).context("failed to render inspect report")?;
        println!("{rendered}");
        return Ok(());
    }

    for warning in &report.warnings {
        warn!(warning = %warning, "extraction warning");
    }
    info!(
        document_type = %report.document_type.as_str(),
        first_name = %report.summary.first_name,
        last_name = %report.summary.last_name,
        dob = %report.summary.dob,
        sex = %report.summary.sex,
        medicare = %report.summary.medicare,
        success = report.success,
        "inspection summary"
    );

    Ok(())
}
