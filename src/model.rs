use serde::Serialize;

use crate::normalize;

pub const PLACEHOLDER_FIRST_NAME: &str = "UNKNOWN";
pub const PLACEHOLDER_LAST_NAME: &str = "PATIENT";
pub const PLACEHOLDER_DOB: &str = "19000101";
pub const MEDICARE_NOT_PROVIDED: &str = "Not provided";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    ConsentForm,
    SpecialistReferral,
    GpReferral,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConsentForm => "consent-form",
            Self::SpecialistReferral => "specialist-referral",
            Self::GpReferral => "gp-referral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sex {
    Male,
    Female,
    Unknown,
}

impl Sex {
    pub fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Unknown => "U",
        }
    }

    pub fn word(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown => "Unknown",
        }
    }
}

/// Demographics recovered from one document. Core fields always hold a
/// value; placeholders stand in for anything the rules could not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRecord {
    pub first_name: String,
    pub last_name: String,
    /// YYYYMMDD.
    pub dob: String,
    pub sex: Sex,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub medicare_number: Option<String>,
    pub medicare_reference: Option<String>,
}

impl Default for PatientRecord {
    fn default() -> Self {
        Self {
            first_name: PLACEHOLDER_FIRST_NAME.to_string(),
            last_name: PLACEHOLDER_LAST_NAME.to_string(),
            dob: PLACEHOLDER_DOB.to_string(),
            sex: Sex::Unknown,
            phone: None,
            address: None,
            suburb: None,
            state: None,
            postcode: None,
            medicare_number: None,
            medicare_reference: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    pub document_type: DocumentType,
    pub patient: PatientRecord,
    pub success: bool,
    pub warnings: Vec<String>,
}

impl ExtractionResult {
    /// Result for a document whose text could not be recovered at all.
    pub fn failed(document_type: DocumentType, warning: impl Into<String>) -> Self {
        Self {
            document_type,
            patient: PatientRecord::default(),
            success: false,
            warnings: vec![warning.into()],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DisplaySummary {
    pub first_name: String,
    pub last_name: String,
    /// DD/MM/YYYY presentation.
    pub dob: String,
    pub sex: &'static str,
    pub medicare: String,
}

impl From<&PatientRecord> for DisplaySummary {
    fn from(patient: &PatientRecord) -> Self {
        let medicare = match &patient.medicare_number {
            Some(number) => {
                let reference = patient.medicare_reference.as_deref().unwrap_or("1");
                format!("{number}-{reference}")
            }
            None => MEDICARE_NOT_PROVIDED.to_string(),
        };

        Self {
            first_name: patient.first_name.clone(),
            last_name: patient.last_name.clone(),
            dob: normalize::dob_to_display(&patient.dob),
            sex: patient.sex.word(),
            medicare,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub document_type: DocumentType,
    pub success: bool,
    pub summary: DisplaySummary,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ConversionManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub input_path: String,
    pub input_sha256: String,
    pub output_path: String,
    pub document_type: DocumentType,
    pub success: bool,
    pub warnings: Vec<String>,
    pub summary: DisplaySummary,
    pub message_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_carries_placeholders() {
        let record = PatientRecord::default();
        assert_eq!(record.first_name, "UNKNOWN");
        assert_eq!(record.last_name, "PATIENT");
        assert_eq!(record.dob, "19000101");
        assert_eq!(record.sex, Sex::Unknown);
        assert!(record.medicare_number.is_none());
    }

    #[test]
    fn display_summary_formats_medicare_pair() {
        let record = PatientRecord {
            medicare_number: Some("4123456789".to_string()),
            medicare_reference: Some("3".to_string()),
            ..PatientRecord::default()
        };
        let summary = DisplaySummary::from(&record);
        assert_eq!(summary.medicare, "4123456789-3");
    }

    #[test]
    fn display_summary_defaults_medicare_reference_to_one() {
        let record = PatientRecord {
            medicare_number: Some("4123456789".to_string()),
            ..PatientRecord::default()
        };
        assert_eq!(DisplaySummary::from(&record).medicare, "4123456789-1");
    }

    #[test]
    fn display_summary_uses_sentinel_when_medicare_missing() {
        let summary = DisplaySummary::from(&PatientRecord::default());
        assert_eq!(summary.medicare, "Not provided");
        assert_eq!(summary.dob, "01/01/1900");
        assert_eq!(summary.sex, "Unknown");
    }
}
