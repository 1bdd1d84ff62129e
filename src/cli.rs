use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::hl7::ResultStatus;
use crate::model::DocumentType;

#[derive(Parser, Debug)]
#[command(
    name = "pdf2hl7",
    version,
    about = "Convert clinical PDF documents to Genie-compatible HL7 v2.4 messages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Convert(ConvertArgs),
    Inspect(InspectArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum DocumentTypeArg {
    Auto,
    ConsentForm,
    SpecialistReferral,
    GpReferral,
}

impl DocumentTypeArg {
    pub fn forced(self) -> Option<DocumentType> {
        match self {
            Self::Auto => None,
            Self::ConsentForm => Some(DocumentType::ConsentForm),
            Self::SpecialistReferral => Some(DocumentType::SpecialistReferral),
            Self::GpReferral => Some(DocumentType::GpReferral),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ResultStatusArg {
    Final,
    Preliminary,
}

impl ResultStatusArg {
    pub fn as_status(self) -> ResultStatus {
        match self {
            Self::Final => ResultStatus::Final,
            Self::Preliminary => ResultStatus::Preliminary,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Source PDF document.
    pub input: PathBuf,

    /// Output path; defaults to the generated filename next to the input.
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = DocumentTypeArg::Auto)]
    pub document_type: DocumentTypeArg,

    #[arg(long, value_enum, default_value_t = ResultStatusArg::Final)]
    pub result_status: ResultStatusArg,

    #[arg(long)]
    pub ordering_provider: Option<String>,

    #[arg(long)]
    pub sending_application: Option<String>,

    #[arg(long)]
    pub sending_facility: Option<String>,

    #[arg(long)]
    pub receiving_application: Option<String>,

    #[arg(long)]
    pub receiving_facility: Option<String>,

    #[arg(long)]
    pub document_title: Option<String>,

    /// Write a JSON conversion manifest describing the run.
    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Source PDF document.
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t = DocumentTypeArg::Auto)]
    pub document_type: DocumentTypeArg,

    /// Print the extraction report as JSON on stdout.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
