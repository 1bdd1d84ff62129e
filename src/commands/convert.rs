use std::fs;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::ConvertArgs;
use crate::extract::Pipeline;
use crate::hl7::{self, MessageOptions};
use crate::model::{ConversionManifest, DisplaySummary, DocumentType, ExtractionResult};
use crate::pdftext;
use crate::util::{now_utc_string, sha256_hex, write_json_pretty};

pub fn run(args: ConvertArgs) -> Result<()> {
    let input = &args.input;
    if !input.exists() {
        bail!("input file not found: {}", input.display());
    }

    info!(input = %input.display(), "starting conversion");

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

    for warning in &result.warnings {
        warn!(warning = %warning, "extraction warning");
    }
    if !result.success {
        warn!("partial extraction, placeholder values substituted for missing fields");
    }

    let summary = DisplaySummary::from(&result.patient);
    info!(
        document_type = %result.document_type.as_str(),
        first_name = %summary.first_name,
        last_name = %summary.last_name,
        dob = %summary.dob,
        sex = %summary.sex,
        medicare = %summary.medicare,
        success = result.success,
        "extraction summary"
    );

    let payload = fs::read(input)
        .with_context(|| format!("failed to read input document: {}", input.display()))?;

    let options = message_options(&args);
    let message = hl7::build_message(&result.patient, &payload, &options);

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| input.with_file_name(hl7::suggest_filename(&result.patient)));
    fs::write(&output_path, &message)
        .with_context(|| format!("failed to write hl7 message: {}", output_path.display()))?;

    info!(
        path = %output_path.display(),
        bytes = message.len(),
        "wrote hl7 message"
    );

    if let Some(manifest_path) = &args.manifest_path {
        let manifest = ConversionManifest {
            manifest_version: 1,
            generated_at: now_utc_string(),
            input_path: input.display().to_string(),
            input_sha256: sha256_hex(&payload),
            output_path: output_path.display().to_string(),
            document_type: result.document_type,
            success: result.success,
            warnings: result.warnings.clone(),
            summary,
            message_bytes: message.len(),
        };
        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote conversion manifest");
    }

    Ok(())
}

fn message_options(args: &ConvertArgs) -> MessageOptions {
    let defaults = MessageOptions::default();
    MessageOptions {
        sending_application: args
            .sending_application
            .clone()
            .unwrap_or(defaults.sending_application),
        sending_facility: args
            .sending_facility
            .clone()
            .unwrap_or(defaults.sending_facility),
        receiving_application: args
            .receiving_application
            .clone()
            .unwrap_or(defaults.receiving_application),
        receiving_facility: args
            .receiving_facility
            .clone()
            .unwrap_or(defaults.receiving_facility),
        document_title: args.document_title.clone().unwrap_or(defaults.document_title),
        result_status: args.result_status.as_status(),
        ordering_provider: args.ordering_provider.clone(),
    }
}
