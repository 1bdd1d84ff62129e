use anyhow::Result;

use crate::model::DocumentType;

use super::{Field, FieldRule, MissingCheck, RuleSet, WarningRule};

/// General-practice referral: a lowercase "re." line names the patient with
/// a title (the most reliable sex signal on any layout), and demographics
/// sit on labeled lines below it. Addresses come as a street line plus a
/// "suburb. postcode" line, with the specialist single-line form as the
/// fallback.
pub(super) fn rules() -> Result<RuleSet> {
    Ok(RuleSet {
        document_type: DocumentType::GpReferral,
        rules: vec![
            FieldRule::new(
                "reference line",
                r"(?im)^\s*re\s*[.:]\s*(Mr|Mrs|Miss|Ms|Dr)\.?\s+([A-Za-z]+)\s+([A-Za-z]+)",
                &[Field::Title, Field::FirstName, Field::LastName],
            )?,
            FieldRule::new(
                "date of birth",
                r"(?i)(?:Date of Birth|D\.O\.B\.?|DOB)\s*:?\s*(\d{1,2}/\d{1,2}/\d{4})",
                &[Field::DateOfBirth],
            )?,
            FieldRule::new(
                "medicare number",
                r"(?i)Medicare\s*(?:Card\s*)?(?:No\.?|Number|#)?\s*:?\s*(\d{10})[ \t]*(\d)?",
                &[Field::MedicareNumber, Field::MedicareReference],
            )?,
            FieldRule::new(
                "mobile phone",
                r"(?i)Mobile\s*(?:No\.?|Number)?\s*:?\s*([\d][\d ]{6,10}\d)",
                &[Field::Phone],
            )?,
            FieldRule::new(
                "phone fallback",
                r"(?i)\b(?:Telephone|Phone|Mobile|Contact|Tel|Ph)\.?\s*(?:No\.?|Number)?\s*:?\s*([\d][\d ]{6,10}\d)",
                &[Field::Phone],
            )?,
            FieldRule::new(
                "address block",
                r"(?m)^\s*(\d+[A-Za-z]?[^\n]*?)\s*\n\s*([A-Za-z][A-Za-z ]*?)\.\s*(\d{4})\s*$",
                &[Field::Address, Field::Suburb, Field::Postcode],
            )?,
            FieldRule::new(
                "address line fallback",
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
                message: "Could not determine sex from title or pronouns",
            },
            WarningRule {
                check: MissingCheck::Field(Field::MedicareNumber),
                message: "Could not extract Medicare number",
            },
        ],
        pronoun_fallback: true,
    })
}
