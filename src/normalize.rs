use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::Regex;

use crate::model::{PLACEHOLDER_DOB, Sex};

/// Trim and collapse internal whitespace (including line breaks) to single
/// spaces.
pub fn clean_field(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip all whitespace. Phone and Medicare numbers are stored contiguous.
pub fn strip_whitespace(raw: &str) -> String {
    raw.chars().filter(|ch| !ch.is_whitespace()).collect()
}

/// Convert an Australian `D/M/YYYY` date (1-2 digit day/month) to HL7
/// `YYYYMMDD`. Anything unparseable collapses to the sentinel.
pub fn dob_to_hl7(raw: &str) -> String {
    NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y")
        .map(|date| date.format("%Y%m%d").to_string())
        .unwrap_or_else(|_| PLACEHOLDER_DOB.to_string())
}

/// Render a stored `YYYYMMDD` date back to `DD/MM/YYYY` for display.
pub fn dob_to_display(dob: &str) -> String {
    NaiveDate::parse_from_str(dob, "%Y%m%d")
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|_| dob.to_string())
}

/// Infer an Australian state from the first digit of a 4-digit postcode.
/// A first-digit lookup is a documented approximation, not geocoding;
/// missing, malformed, and unmapped postcodes all resolve to VIC.
pub fn state_from_postcode(postcode: &str) -> &'static str {
    let postcode = postcode.trim();
    if postcode.len() != 4 || !postcode.bytes().all(|byte| byte.is_ascii_digit()) {
        return "VIC";
    }

    match postcode.as_bytes()[0] {
        b'0' => "NT",
        b'2' => "NSW",
        b'3' => "VIC",
        b'4' => "QLD",
        b'5' => "SA",
        b'6' => "WA",
        b'7' => "TAS",
        _ => "VIC",
    }
}

/// Resolve sex from a salutation title. Dr and Mx carry no signal.
pub fn sex_from_title(title: &str) -> Sex {
    match title.trim().to_ascii_lowercase().as_str() {
        "mr" => Sex::Male,
        "mrs" | "miss" | "ms" => Sex::Female,
        _ => Sex::Unknown,
    }
}

/// Pronoun-frequency sex inference for letters that never state a title.
/// Counts whole-word masculine vs feminine pronouns; the majority group
/// wins only when strictly ahead and seen at least twice. The thresholds
/// are observable behavior and tests pin them.
#[derive(Debug)]
pub struct SexInference {
    masculine: Regex,
    feminine: Regex,
}

impl SexInference {
    pub fn new() -> Result<Self> {
        Ok(Self {
            masculine: Regex::new(r"(?i)\b(?:he|him|his)\b")
                .context("failed to compile masculine pronoun pattern")?,
            feminine: Regex::new(r"(?i)\b(?:she|her|hers)\b")
                .context("failed to compile feminine pronoun pattern")?,
        })
    }

    pub fn from_pronouns(&self, text: &str) -> Sex {
        let masculine = self.masculine.find_iter(text).count();
        let feminine = self.feminine.find_iter(text).count();

        if masculine > feminine && masculine >= 2 {
            Sex::Male
        } else if feminine > masculine && feminine >= 2 {
            Sex::Female
        } else {
            Sex::Unknown
        }
    }
}
