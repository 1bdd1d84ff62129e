use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Local;
use rand::Rng;

use crate::model::PatientRecord;

pub const FIELD_SEPARATOR: &str = "|";
pub const COMPONENT_SEPARATOR: &str = "^";
pub const ENCODING_CHARACTERS: &str = "^~\\&";
pub const SEGMENT_TERMINATOR: &str = "\r";

const MESSAGE_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const FILE_EXTENSION: &str = ".hl7";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    Final,
    Preliminary,
}

impl ResultStatus {
    pub fn code(self) -> &'static str {
        match self {
            Self::Final => "F",
            Self::Preliminary => "P",
        }
    }
}

/// Assembler configuration. Identifiers default to the receiving system's
/// production values but are plain data, so multiple tenants can carry
/// their own set.
#[derive(Debug, Clone)]
pub struct MessageOptions {
    pub sending_application: String,
    pub sending_facility: String,
    pub receiving_application: String,
    pub receiving_facility: String,
    pub document_title: String,
    pub result_status: ResultStatus,
    pub ordering_provider: Option<String>,
}

impl Default for MessageOptions {
    fn default() -> Self {
        Self {
            sending_application: "MEDIHOST".to_string(),
            sending_facility: "BJCHEALTH".to_string(),
            receiving_application: "GENIE".to_string(),
            receiving_facility: "CLINIC".to_string(),
            document_title: "Patient Consent Form".to_string(),
            result_status: ResultStatus::Final,
            ordering_provider: None,
        }
    }
}

/// Escape reserved HL7 characters in free-text values. Backslash is
/// replaced first so later substitutions never double-escape.
pub fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\E\\")
        .replace('|', "\\F\\")
        .replace('^', "\\S\\")
        .replace('~', "\\R\\")
        .replace('&', "\\T\\")
}

/// Second-precision local timestamp, YYYYMMDDHHMMSS.
pub fn timestamp_now() -> String {
    Local::now().format("%Y%m%d%H%M%S").to_string()
}

fn message_control_id(timestamp: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..4)
        .map(|_| MESSAGE_ID_CHARSET[rng.gen_range(0..MESSAGE_ID_CHARSET.len())] as char)
        .collect();
    format!("MSG{timestamp}{suffix}")
}

fn build_msh(options: &MessageOptions, timestamp: &str) -> String {
    let control_id = message_control_id(timestamp);
    let fields = [
        "MSH",
        ENCODING_CHARACTERS,
        options.sending_application.as_str(),
        options.sending_facility.as_str(),
        options.receiving_application.as_str(),
        options.receiving_facility.as_str(),
        timestamp,
        "", // security
        "ORU^R01",
        control_id.as_str(),
        "P", // processing id
        "2.4",
        "", // sequence number
        "", // continuation pointer
        "AL",
        "NE",
        "AUS",
        "8859/1",
    ];
    fields.join(FIELD_SEPARATOR)
}

fn build_pid(patient: &PatientRecord) -> String {
    let patient_id = match &patient.medicare_number {
        Some(number) => {
            let reference = patient.medicare_reference.as_deref().unwrap_or("1");
            format!("{number}-{reference}^^^Medicare^MC")
        }
        None => String::new(),
    };

    let address = if patient.address.is_some() || patient.suburb.is_some() {
        [
            escape_text(patient.address.as_deref().unwrap_or("")),
            String::new(), // street 2
            escape_text(patient.suburb.as_deref().unwrap_or("")),
            patient.state.clone().unwrap_or_else(|| "VIC".to_string()),
            patient.postcode.clone().unwrap_or_default(),
            "AUS".to_string(),
        ]
        .join(COMPONENT_SEPARATOR)
    } else {
        String::new()
    };

    let patient_name = format!(
        "{}{}{}",
        escape_text(&patient.last_name),
        COMPONENT_SEPARATOR,
        escape_text(&patient.first_name)
    );

    let phone = patient
        .phone
        .as_deref()
        .map(escape_text)
        .unwrap_or_default();

    let fields = [
        "PID".to_string(),
        "1".to_string(),
        String::new(), // external id
        patient_id,
        String::new(), // alternate id
        patient_name,
        String::new(), // mother's maiden name
        patient.dob.clone(),
        patient.sex.code().to_string(),
        String::new(), // alias
        String::new(), // race
        address,
        String::new(), // county code
        phone,
    ];
    fields.join(FIELD_SEPARATOR)
}

fn build_pv1() -> String {
    ["PV1", "1", "O"].join(FIELD_SEPARATOR)
}

fn build_obr(options: &MessageOptions, timestamp: &str) -> String {
    let report_id = format!("RPT{timestamp}^{}", options.sending_application);
    let service_id = format!("PDF^{}^L", escape_text(&options.document_title));

    let mut fields = vec![
        "OBR".to_string(),
        "1".to_string(),
        String::new(),
        report_id,
        service_id,
        String::new(),
        String::new(),
        timestamp.to_string(), // OBR-7 observation date/time
    ];

    // OBR-8 through OBR-21; the ordering provider sits at OBR-16 and is an
    // opaque pass-through, so it keeps whatever component structure the
    // caller supplied.
    for index in 8..22 {
        if index == 16 {
            fields.push(options.ordering_provider.clone().unwrap_or_default());
        } else {
            fields.push(String::new());
        }
    }

    fields.push(timestamp.to_string()); // OBR-22 results report/status change
    fields.push(String::new());
    fields.push(String::new());
    fields.push(options.result_status.code().to_string()); // OBR-25

    fields.join(FIELD_SEPARATOR)
}

fn build_obx(payload_base64: &str, result_status: ResultStatus) -> String {
    let observation_value = format!("^application^pdf^Base64^{payload_base64}");

    let fields = [
        "OBX",
        "1",
        "ED",
        "PDF^Display format in PDF^AUSPDI",
        "", // sub-id
        &observation_value,
        "", // units
        "", // reference range
        "", // abnormal flags
        "", // probability
        "", // nature of abnormal test
        result_status.code(),
    ];
    fields.join(FIELD_SEPARATOR)
}

/// Assemble the complete five-segment message with the source document
/// embedded as a base64 payload. Every segment ends with a bare CR,
/// including the last one.
pub fn build_message(patient: &PatientRecord, payload: &[u8], options: &MessageOptions) -> String {
    let timestamp = timestamp_now();
    let payload_base64 = BASE64.encode(payload);

    let segments = [
        build_msh(options, &timestamp),
        build_pid(patient),
        build_pv1(),
        build_obr(options, &timestamp),
        build_obx(&payload_base64, options.result_status),
    ];

    let mut message = segments.join(SEGMENT_TERMINATOR);
    message.push_str(SEGMENT_TERMINATOR);
    message
}

/// Output filename derived from the patient name, with everything outside
/// ASCII alphanumerics flattened to underscores.
pub fn suggest_filename(patient: &PatientRecord) -> String {
    let stem = format!(
        "{}_{}_{}",
        patient.last_name,
        patient.first_name,
        timestamp_now()
    );
    let safe: String = stem
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect();
    format!("{safe}{FILE_EXTENSION}")
}

#[cfg(test)]
mod tests {
    use base64::Engine as _;

    use super::*;
    use crate::model::{PatientRecord, Sex};

    fn sample_patient() -> PatientRecord {
        PatientRecord {
            first_name: "John".to_string(),
            last_name: "Smith".to_string(),
            dob: "19800615".to_string(),
            sex: Sex::Male,
            phone: Some("0412345678".to_string()),
            address: Some("12 Example Street".to_string()),
            suburb: Some("Richmond".to_string()),
            state: Some("VIC".to_string()),
            postcode: Some("3121".to_string()),
            medicare_number: Some("4123456789".to_string()),
            medicare_reference: Some("1".to_string()),
        }
    }

    fn segments(message: &str) -> Vec<&str> {
        message
            .split(SEGMENT_TERMINATOR)
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    #[test]
    fn escaping_handles_every_reserved_character_in_order() {
        assert_eq!(escape_text(r"a\b"), r"a\E\b");
        assert_eq!(escape_text("a|b"), r"a\F\b");
        assert_eq!(escape_text("a^b"), r"a\S\b");
        assert_eq!(escape_text("a~b"), r"a\R\b");
        assert_eq!(escape_text("a&b"), r"a\T\b");
        // a backslash introduced by input must not be re-escaped
        assert_eq!(escape_text(r"\^"), r"\E\\S\");
    }

    #[test]
    fn message_has_five_segments_with_fixed_tags_in_order() {
        let message = build_message(&sample_patient(), b"%PDF-1.4", &MessageOptions::default());
        assert!(message.ends_with(SEGMENT_TERMINATOR));
        assert!(!message.contains('\n'));

        let segments = segments(&message);
        assert_eq!(segments.len(), 5);
        let tags: Vec<&str> = segments
            .iter()
            .map(|segment| segment.split(FIELD_SEPARATOR).next().unwrap_or(""))
            .collect();
        assert_eq!(tags, vec!["MSH", "PID", "PV1", "OBR", "OBX"]);
    }

    #[test]
    fn msh_carries_identifiers_and_constants() {
        let message = build_message(&sample_patient(), b"x", &MessageOptions::default());
        let binding = segments(&message);
        let msh: Vec<&str> = binding[0].split(FIELD_SEPARATOR).collect();

        assert_eq!(msh[1], ENCODING_CHARACTERS);
        assert_eq!(msh[2], "MEDIHOST");
        assert_eq!(msh[3], "BJCHEALTH");
        assert_eq!(msh[4], "GENIE");
        assert_eq!(msh[5], "CLINIC");
        assert_eq!(msh[8], "ORU^R01");
        assert_eq!(msh[10], "P");
        assert_eq!(msh[11], "2.4");
        assert_eq!(msh[16], "AUS");
        assert_eq!(msh[17], "8859/1");
    }

    #[test]
    fn message_control_id_is_timestamp_plus_four_base36_chars() {
        let id = message_control_id("20240102030405");
        assert_eq!(id.len(), 3 + 14 + 4);
        assert!(id.starts_with("MSG20240102030405"));
        assert!(
            id[17..]
                .chars()
                .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit())
        );
    }

    #[test]
    fn pid_formats_name_medicare_and_address() {
        let pid = build_pid(&sample_patient());
        let fields: Vec<&str> = pid.split(FIELD_SEPARATOR).collect();

        assert_eq!(fields[3], "4123456789-1^^^Medicare^MC");
        assert_eq!(fields[5], "Smith^John");
        assert_eq!(fields[7], "19800615");
        assert_eq!(fields[8], "M");
        assert_eq!(fields[11], "12 Example Street^^Richmond^VIC^3121^AUS");
        assert_eq!(fields[13], "0412345678");
    }

    #[test]
    fn pid_leaves_identifier_and_address_empty_when_unknown() {
        let pid = build_pid(&PatientRecord::default());
        let fields: Vec<&str> = pid.split(FIELD_SEPARATOR).collect();

        assert_eq!(fields[3], "");
        assert_eq!(fields[5], "PATIENT^UNKNOWN");
        assert_eq!(fields[8], "U");
        assert_eq!(fields[11], "");
        assert_eq!(fields[13], "");
    }

    #[test]
    fn pid_defaults_medicare_reference_and_state() {
        let patient = PatientRecord {
            medicare_number: Some("4123456789".to_string()),
            medicare_reference: None,
            address: Some("1 Test St".to_string()),
            state: None,
            ..PatientRecord::default()
        };
        let fields: Vec<String> = build_pid(&patient)
            .split(FIELD_SEPARATOR)
            .map(str::to_string)
            .collect();

        assert_eq!(fields[3], "4123456789-1^^^Medicare^MC");
        assert_eq!(fields[11], "1 Test St^^^VIC^^AUS");
    }

    #[test]
    fn caret_in_a_name_is_escaped_in_the_serialized_message() {
        let patient = PatientRecord {
            last_name: "Sm^th".to_string(),
            ..sample_patient()
        };
        let pid = build_pid(&patient);
        let fields: Vec<&str> = pid.split(FIELD_SEPARATOR).collect();

        assert_eq!(fields[5], r"Sm\S\th^John");
    }

    #[test]
    fn obr_places_timestamps_provider_and_status_at_fixed_positions() {
        let options = MessageOptions {
            ordering_provider: Some("0191322T^Jones^Sarah".to_string()),
            result_status: ResultStatus::Preliminary,
            ..MessageOptions::default()
        };
        let obr = build_obr(&options, "20240102030405");
        let fields: Vec<&str> = obr.split(FIELD_SEPARATOR).collect();

        assert_eq!(fields.len(), 26);
        assert_eq!(fields[1], "1");
        assert_eq!(fields[3], "RPT20240102030405^MEDIHOST");
        assert_eq!(fields[4], "PDF^Patient Consent Form^L");
        assert_eq!(fields[7], "20240102030405");
        assert_eq!(fields[16], "0191322T^Jones^Sarah");
        assert_eq!(fields[22], "20240102030405");
        assert_eq!(fields[25], "P");
    }

    #[test]
    fn obr_defaults_keep_final_status_and_empty_provider() {
        let obr = build_obr(&MessageOptions::default(), "20240102030405");
        let fields: Vec<&str> = obr.split(FIELD_SEPARATOR).collect();

        assert_eq!(fields[16], "");
        assert_eq!(fields[25], "F");
    }

    #[test]
    fn obx_payload_round_trips_through_base64() {
        let payload = b"%PDF-1.4 binary \x00\x01\x02 payload";
        let message = build_message(&sample_patient(), payload, &MessageOptions::default());
        let binding = segments(&message);
        let obx: Vec<&str> = binding[4].split(FIELD_SEPARATOR).collect();

        assert_eq!(obx[2], "ED");
        assert_eq!(obx[3], "PDF^Display format in PDF^AUSPDI");
        assert_eq!(obx[11], "F");

        let value = obx[5];
        let encoded = value
            .strip_prefix("^application^pdf^Base64^")
            .expect("observation value prefix");
        assert!(!encoded.contains('\n'));
        let decoded = BASE64.decode(encoded).expect("valid base64");
        assert_eq!(decoded, payload);
    }

    #[test]
    fn empty_payload_round_trips() {
        let message = build_message(&sample_patient(), b"", &MessageOptions::default());
        let binding = segments(&message);
        let obx: Vec<&str> = binding[4].split(FIELD_SEPARATOR).collect();

        assert_eq!(obx[5], "^application^pdf^Base64^");
        let decoded = BASE64.decode("").expect("valid base64");
        assert!(decoded.is_empty());
    }

    #[test]
    fn filename_flattens_non_alphanumerics() {
        let patient = PatientRecord {
            first_name: "Mary Jane".to_string(),
            last_name: "O'Brien".to_string(),
            ..PatientRecord::default()
        };
        let filename = suggest_filename(&patient);

        assert!(filename.starts_with("O_Brien_Mary_Jane_"));
        assert!(filename.ends_with(".hl7"));
        let stem = filename.trim_end_matches(".hl7");
        assert!(stem.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_'));
    }
}
