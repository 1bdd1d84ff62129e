use anyhow::Result;

use crate::model::DocumentType;

use super::{Field, FieldRule, MissingCheck, RuleSet, WarningRule};

/// Specialist letter: the subject-reference line carries name and date of
/// birth in one hit, everything else is scattered through the prose.
/// Medicare details are not expected on this layout, so their absence is
/// not warned about.
pub(super) fn rules() -> Result<RuleSet> {
    Ok(RuleSet {
        document_type: DocumentType::SpecialistReferral,
        rules: vec![
            FieldRule::new(
                "reference line",
                r"(?im)^\s*RE\s*:\s*([A-Za-z]+)\s+([A-Za-z]+)\s*[-–]\s*DOB\s*:?\s*(\d{1,2}/\d{1,2}/\d{4})",
                &[Field::FirstName, Field::LastName, Field::DateOfBirth],
            )?,
            FieldRule::new(
                "inverted reference line",
                r"(?im)^\s*RE\s*:\s*([A-Za-z]+)\s*,\s*([A-Za-z]+)(?:\s*[-–]\s*DOB\s*:?\s*(\d{1,2}/\d{1,2}/\d{4}))?",
                &[Field::LastName, Field::FirstName, Field::DateOfBirth],
            )?,
            FieldRule::new(
                "phone",
                r"(?i)\b(?:Telephone|Phone|Mobile|Contact|Tel|Ph)\.?\s*(?:No\.?|Number)?\s*:?\s*([\d][\d ]{6,10}\d)",
                &[Field::Phone],
            )?,
            FieldRule::new(
                "address line",
                r"(?im)^\s*(\d+[A-Za-z]?[^,\n]*?),\s*([A-Za-z][A-Za-z ]*?),\s*(NSW|VIC|QLD|SA|WA|TAS|NT|ACT),?\s*(\d{4})\s*$",
                &[Field::Address, Field::Suburb, Field::State, Field::Postcode],
            )?,
        ],
        warnings: vec![
            WarningRule {
                check: MissingCheck::Field(Field::FirstName),
                message: "Could not extract first name",
            },
            WarningRule {
                check: MissingCheck::Field(Field::LastName),
                message: "Could not extract last name",
            },
            WarningRule {
                check: MissingCheck::Field(Field::DateOfBirth),
                message: "Could not extract date of birth",
            },
            WarningRule {
                check: MissingCheck::Sex,
                message: "Could not determine sex from pronouns",
            },
        ],
        pronoun_fallback: true,
    })
}
