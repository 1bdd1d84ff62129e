use anyhow::{Context, Result};
use regex::Regex;

use crate::model::DocumentType;

/// Assigns one of the known document layouts from extracted text.
///
/// Referral letters carry both a salutation and a subject-reference line;
/// anything without both is treated as a consent form. The GP-vs-specialist
/// split rests on two weak signals ORed together (a titled patient name in
/// the reference line, or a labeled Medicare number anywhere in the text) —
/// the precedence is part of the observable contract and must not be
/// reordered.
#[derive(Debug)]
pub struct DocumentClassifier {
    salutation_doctor: Regex,
    salutation_name: Regex,
    subject_reference: Regex,
    gp_reference_line: Regex,
    labeled_medicare: Regex,
}

impl DocumentClassifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            salutation_doctor: Regex::new(r"(?m)^\s*Dear\s+(?:Dr|Prof(?:essor)?)\.?\s+[A-Z]")
                .context("failed to compile doctor salutation pattern")?,
            salutation_name: Regex::new(r"(?m)^\s*Dear\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?\s*,")
                .context("failed to compile name salutation pattern")?,
            subject_reference: Regex::new(r"(?i)\bre\s*[.:]")
                .context("failed to compile subject reference pattern")?,
            gp_reference_line: Regex::new(
                r"(?im)^\s*re\s*[.:]\s*(?:Mr|Mrs|Miss|Ms|Dr)\.?\s+[A-Za-z]+\s+[A-Za-z]+",
            )
            .context("failed to compile titled reference line pattern")?,
            labeled_medicare: Regex::new(
                r"(?i)Medicare\s*(?:Card\s*)?(?:No\.?|Number|#)?\s*:?\s*\d{10,11}\b",
            )
            .context("failed to compile labeled medicare pattern")?,
        })
    }

    pub fn classify(&self, text: &str) -> DocumentType {
        let salutation =
            self.salutation_doctor.is_match(text) || self.salutation_name.is_match(text);
        let subject_reference = self.subject_reference.is_match(text);

        if !(salutation && subject_reference) {
            return DocumentType::ConsentForm;
        }

        if self.gp_reference_line.is_match(text) || self.labeled_medicare.is_match(text) {
            DocumentType::GpReferral
        } else {
            DocumentType::SpecialistReferral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> DocumentClassifier {
        DocumentClassifier::new().expect("patterns compile")
    }

    #[test]
    fn structured_form_without_letter_markers_is_consent() {
        let text = "Patient Consent Form\nFirst Name *\nJane\nLast Name *\nCitizen\n";
        assert_eq!(classifier().classify(text), DocumentType::ConsentForm);
    }

    #[test]
    fn empty_text_is_consent() {
        assert_eq!(classifier().classify(""), DocumentType::ConsentForm);
    }

    #[test]
    fn salutation_without_subject_reference_is_consent() {
        let text = "Dear Dr Nguyen\n\nThank you for seeing this patient.\n";
        assert_eq!(classifier().classify(text), DocumentType::ConsentForm);
    }

    #[test]
    fn subject_reference_without_salutation_is_consent() {
        let text = "RE: John SMITH - DOB: 15/06/1980\n\nBloods attached.\n";
        assert_eq!(classifier().classify(text), DocumentType::ConsentForm);
    }

    #[test]
    fn referral_without_gp_signals_is_specialist() {
        let text = "Dear Dr Nguyen\n\nRE: John SMITH - DOB: 15/06/1980\n\nThank you.\n";
        assert_eq!(classifier().classify(text), DocumentType::SpecialistReferral);
    }

    #[test]
    fn capitalized_name_salutation_also_marks_a_referral() {
        let text = "Dear Sarah,\n\nRE: John SMITH - DOB: 15/06/1980\n";
        assert_eq!(classifier().classify(text), DocumentType::SpecialistReferral);
    }

    #[test]
    fn titled_reference_line_marks_gp_referral() {
        let text = "Dear Dr Wu\n\nre. Mr John Citizen\nDOB: 15/06/1980\n";
        assert_eq!(classifier().classify(text), DocumentType::GpReferral);
    }

    #[test]
    fn labeled_medicare_number_marks_gp_referral() {
        let text = "Dear Professor Hall\n\nRE: John SMITH - DOB: 15/06/1980\nMedicare No: 41234567891\n";
        assert_eq!(classifier().classify(text), DocumentType::GpReferral);
    }

    #[test]
    fn classification_is_deterministic() {
        let classifier = classifier();
        let text = "Dear Dr Nguyen\n\nRE: John SMITH - DOB: 15/06/1980\n";
        assert_eq!(classifier.classify(text), classifier.classify(text));
    }
}
