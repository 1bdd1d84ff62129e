use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use crate::classify::DocumentClassifier;
use crate::model::{
    DocumentType, ExtractionResult, PLACEHOLDER_DOB, PLACEHOLDER_FIRST_NAME,
    PLACEHOLDER_LAST_NAME, PatientRecord, Sex,
};
use crate::normalize::{self, SexInference};

mod consent;
mod gp;
mod specialist;

pub const NO_TEXT_WARNING: &str = "PDF contains no extractable text";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Title,
    FirstName,
    LastName,
    DateOfBirth,
    Phone,
    Address,
    Suburb,
    State,
    Postcode,
    MedicareNumber,
    MedicareReference,
}

const FIELD_COUNT: usize = 11;

#[derive(Debug)]
struct FieldBag {
    values: Vec<Option<String>>,
}

impl FieldBag {
    fn new() -> Self {
        Self {
            values: vec![None; FIELD_COUNT],
        }
    }

    fn is_set(&self, field: Field) -> bool {
        self.values[field as usize].is_some()
    }

    fn set(&mut self, field: Field, value: String) {
        self.values[field as usize] = Some(value);
    }

    fn get(&self, field: Field) -> Option<&str> {
        self.values[field as usize].as_deref()
    }

    fn take(&mut self, field: Field) -> Option<String> {
        self.values[field as usize].take()
    }
}

/// One extraction rule: a compiled pattern whose capture groups map, in
/// order, onto `targets`. Rules for the same primary field act as ordered
/// fallbacks — a rule is skipped once its primary target is resolved.
struct FieldRule {
    name: &'static str,
    regex: Regex,
    targets: &'static [Field],
}

impl FieldRule {
    fn new(name: &'static str, pattern: &str, targets: &'static [Field]) -> Result<Self> {
        Ok(Self {
            name,
            regex: Regex::new(pattern)
                .with_context(|| format!("failed to compile {name} pattern"))?,
            targets,
        })
    }
}

enum MissingCheck {
    Field(Field),
    Sex,
}

/// Emitted after the rule pass for every field still unresolved.
struct WarningRule {
    check: MissingCheck,
    message: &'static str,
}

struct RuleSet {
    document_type: DocumentType,
    rules: Vec<FieldRule>,
    warnings: Vec<WarningRule>,
    pronoun_fallback: bool,
}

impl RuleSet {
    fn apply(&self, text: &str, sex_inference: &SexInference) -> ExtractionResult {
        let mut bag = FieldBag::new();

        for rule in &self.rules {
            if bag.is_set(rule.targets[0]) {
                continue;
            }

            let Some(captures) = rule.regex.captures(text) else {
                continue;
            };
            debug!(rule = rule.name, "extraction rule matched");

            for (group, field) in rule.targets.iter().enumerate() {
                if bag.is_set(*field) {
                    continue;
                }
                if let Some(capture) = captures.get(group + 1) {
                    let value = normalize::clean_field(capture.as_str());
                    if !value.is_empty() {
                        bag.set(*field, value);
                    }
                }
            }
        }

        let mut sex = bag
            .get(Field::Title)
            .map(normalize::sex_from_title)
            .unwrap_or(Sex::Unknown);
        if sex == Sex::Unknown && self.pronoun_fallback {
            sex = sex_inference.from_pronouns(text);
        }

        let mut warnings = Vec::new();
        for warning in &self.warnings {
            let missing = match warning.check {
                MissingCheck::Field(field) => !bag.is_set(field),
                MissingCheck::Sex => sex == Sex::Unknown,
            };
            if missing {
                warnings.push(warning.message.to_string());
            }
        }

        let success = bag.is_set(Field::FirstName) && bag.is_set(Field::LastName);
        let patient = build_record(bag, sex);

        ExtractionResult {
            document_type: self.document_type,
            patient,
            success,
            warnings,
        }
    }
}

fn build_record(mut bag: FieldBag, sex: Sex) -> PatientRecord {
    let postcode = bag.take(Field::Postcode);
    let state = bag
        .take(Field::State)
        .map(|state| state.to_uppercase())
        .or_else(|| {
            postcode
                .as_deref()
                .map(|postcode| normalize::state_from_postcode(postcode).to_string())
        });

    PatientRecord {
        first_name: bag
            .take(Field::FirstName)
            .unwrap_or_else(|| PLACEHOLDER_FIRST_NAME.to_string()),
        last_name: bag
            .take(Field::LastName)
            .unwrap_or_else(|| PLACEHOLDER_LAST_NAME.to_string()),
        dob: bag
            .take(Field::DateOfBirth)
            .map(|raw| normalize::dob_to_hl7(&raw))
            .unwrap_or_else(|| PLACEHOLDER_DOB.to_string()),
        sex,
        phone: bag
            .take(Field::Phone)
            .map(|phone| normalize::strip_whitespace(&phone)),
        address: bag.take(Field::Address),
        suburb: bag.take(Field::Suburb),
        state,
        postcode,
        medicare_number: bag
            .take(Field::MedicareNumber)
            .map(|number| normalize::strip_whitespace(&number)),
        medicare_reference: bag.take(Field::MedicareReference),
    }
}

/// The full text-to-record pipeline: classification plus the three layout
/// rule tables, compiled once and reused across documents.
pub struct Pipeline {
    classifier: DocumentClassifier,
    sex_inference: SexInference,
    consent: RuleSet,
    specialist: RuleSet,
    gp: RuleSet,
}

impl Pipeline {
    pub fn new() -> Result<Self> {
        Ok(Self {
            classifier: DocumentClassifier::new()?,
            sex_inference: SexInference::new()?,
            consent: consent::rules()?,
            specialist: specialist::rules()?,
            gp: gp::rules()?,
        })
    }

    pub fn process(&self, text: &str, forced: Option<DocumentType>) -> ExtractionResult {
        if text.trim().is_empty() {
            return ExtractionResult::failed(
                forced.unwrap_or(DocumentType::ConsentForm),
                NO_TEXT_WARNING,
            );
        }

        let document_type = forced.unwrap_or_else(|| self.classifier.classify(text));
        let rules = match document_type {
            DocumentType::ConsentForm => &self.consent,
            DocumentType::SpecialistReferral => &self.specialist,
            DocumentType::GpReferral => &self.gp,
        };

        rules.apply(text, &self.sex_inference)
    }
}
