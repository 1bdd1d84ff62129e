use anyhow::Result;

use crate::model::DocumentType;

use super::{Field, FieldRule, MissingCheck, RuleSet, WarningRule};

/// Structured registration/consent form: each field is a printed label
/// followed by the typed value on the next line. Sex is a title token
/// standing alone on its own line, the text-layer remnant of a ticked box.
pub(super) fn rules() -> Result<RuleSet> {
    Ok(RuleSet {
        document_type: DocumentType::ConsentForm,
        rules: vec![
            FieldRule::new("title", r"(?m)^\s*(Mr|Mrs|Miss|Ms)\s*$", &[Field::Title])?,
            FieldRule::new(
                "first name",
                r"(?i)First Name\s*\*?\s*\n?\s*([A-Za-z]+)",
                &[Field::FirstName],
            )?,
            FieldRule::new(
                "last name",
                r"(?i)Last Name\s*\*?\s*\n?\s*([A-Za-z]+)",
                &[Field::LastName],
            )?,
            FieldRule::new(
                "date of birth",
                r"(?i)Date of Birth\s*\*?\s*\n?\s*(\d{1,2}/\d{1,2}/\d{4})",
                &[Field::DateOfBirth],
            )?,
            FieldRule::new(
                "mobile phone",
                r"(?i)Mobile Phone\s*\*?\s*\n?\s*([\d\s]{10,12})",
                &[Field::Phone],
            )?,
            FieldRule::new(
                "address",
                r"(?is)Address\s*\*?\s*\n?\s*(.+?)\n*(?:Postcode|City)",
                &[Field::Address],
            )?,
            FieldRule::new(
                "postcode",
                r"(?i)Postcode\s*\*?\s*\n?\s*(\d{4})",
                &[Field::Postcode],
            )?,
            FieldRule::new(
                "suburb",
                r"(?i)City\s*/?\s*Suburb\s*\*?\s*\n?\s*([A-Za-z\s]+?)(?:\n|State)",
                &[Field::Suburb],
            )?,
            FieldRule::new(
                "medicare number",
                r"(?i)Medicare Card No\.?\s*\*?\s*\n?\s*(\d{10,11})",
                &[Field::MedicareNumber],
            )?,
            FieldRule::new(
                "medicare reference",
                r"(?i)Medicare Ref\s*(?:Number)?\s*\*?\s*\n?\s*(\d)",
                &[Field::MedicareReference],
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
                message: "Could not determine sex from title",
            },
            WarningRule {
                check: MissingCheck::Field(Field::MedicareNumber),
                message: "Could not extract Medicare number",
            },
        ],
        pronoun_fallback: false,
    })
}
