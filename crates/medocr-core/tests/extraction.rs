use image::DynamicImage;
use medocr_core::{
    extract, extract_image, normalize, DocumentParser, ExtractionError, ExtractionRecord,
    MedicalExtractor, MedocrError, OcrError, TextSource, Vital,
};
use pretty_assertions::assert_eq;
use serde_json::Value;

const DISCHARGE_NOTE: &str = "\
Sunrise Hospital, Ward 4
Name: R. Kumar, 30/M
Blood Pressure: 130 / 90 mmHg\tHeart Rate: 104
Temperature 37.8 C    Respiratory Rate 22   Oxygen Saturation 95 %

Chief Complaints - Breathlessness on exertion
DIAGNOSIS:  Community acquired pneumonia
Medicine Name

1) Tab Azithromycin 500mg OD x 3 days
2) Tab Paracetamol 650mg
   SOS for fever
Follow up - 20-11-26
";

struct FixedText(&'static str);

impl TextSource for FixedText {
    fn extract_text(&self, _image: &DynamicImage) -> Result<String, OcrError> {
        Ok(self.0.to_string())
    }
}

struct BrokenEngine;

impl TextSource for BrokenEngine {
    fn extract_text(&self, _image: &DynamicImage) -> Result<String, OcrError> {
        Err(OcrError::Recognition("detector crashed".to_string()))
    }
}

#[test]
fn test_discharge_note() {
    let record = MedicalExtractor::new().parse(DISCHARGE_NOTE).unwrap().record;

    assert_eq!(record.patient.age.as_deref(), Some("30"));
    assert_eq!(record.patient.gender.as_deref(), Some("M"));
    assert_eq!(record.patient.weight, None);

    assert_eq!(record.vitals[&Vital::Bp], "130/90");
    assert_eq!(record.vitals[&Vital::Pulse], "104");
    assert_eq!(record.vitals[&Vital::Temp], "37.8");
    assert_eq!(record.vitals[&Vital::Rr], "22");
    assert_eq!(record.vitals[&Vital::Spo2], "95");

    assert_eq!(record.complaints, vec!["Breathlessness on exertion"]);
    assert_eq!(record.diagnosis, vec!["Community acquired pneumonia"]);
    assert!(record.reactions.is_empty());
    assert!(record.investigations.is_empty());
    assert!(record.advice.is_empty());
    assert_eq!(
        record.medications,
        vec![
            "Tab Azithromycin 500mg OD x 3 days",
            "Tab Paracetamol 650mg SOS for fever Follow up - 20-11-26",
        ]
    );
    assert_eq!(record.follow_up.date.as_deref(), Some("20-11-26"));
}

#[test]
fn test_every_input_has_fixed_shape() {
    let inputs = ["", "   ", "lorem ipsum", "Diagnosis:", "1)", DISCHARGE_NOTE];
    let keys = [
        "patient",
        "vitals",
        "diagnosis",
        "complaints",
        "reactions",
        "investigations",
        "medications",
        "advice",
        "follow_up",
    ];

    for input in inputs {
        let json = serde_json::to_value(extract(&normalize(input))).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), keys.len(), "input {:?}", input);

        for key in keys {
            let value = &object[key];
            assert!(!value.is_null(), "{} is null for {:?}", key, input);
            match key {
                "patient" | "vitals" | "follow_up" => assert!(value.is_object()),
                _ => assert!(value.is_array()),
            }
        }
    }
}

#[test]
fn test_no_diagnosis_label() {
    let record = extract("BP: 120/80 mmHg\nPulse: 80");
    assert_eq!(record.diagnosis, Vec::<String>::new());
    assert_eq!(record.vitals.len(), 2);
}

#[test]
fn test_json_round_trip() {
    let record = extract(&normalize(DISCHARGE_NOTE));
    let json = serde_json::to_string_pretty(&record).unwrap();
    let back: ExtractionRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);

    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["vitals"]["bp"], "130/90");
    assert_eq!(value["follow_up"]["date"], "20-11-26");
}

#[test]
fn test_extraction_is_deterministic() {
    let parser = MedicalExtractor::new();
    let first = parser.parse(DISCHARGE_NOTE).unwrap().record;
    let second = parser.parse(DISCHARGE_NOTE).unwrap().record;
    assert_eq!(first, second);
}

#[test]
fn test_large_adversarial_input() {
    // Long runs of near-matches for every label, with no terminators.
    let mut text = String::from("Diagnosis: ");
    for _ in 0..20_000 {
        text.push_str("BP 1 Pulse x Temp . Advice Follow Up: 1/ 1) ");
    }

    let parser = MedicalExtractor::new().with_max_input_bytes(usize::MAX);
    let result = parser.parse(&text).unwrap();
    assert!(result.record.diagnosis.is_empty());
    assert!(result.record.vitals.is_empty());
    assert_eq!(result.record.follow_up.date, None);
}

#[test]
fn test_oversized_input_is_truncated() {
    let mut text = "x".repeat(2 * 1024 * 1024);
    text.push_str("\nBP: 120/80");

    let result = MedicalExtractor::new().parse(&text).unwrap();
    assert!(result.record.vitals.is_empty());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.starts_with("input truncated")));
}

#[test]
fn test_extract_image_with_text_source() {
    let image = DynamicImage::new_luma8(8, 8);
    let source = FixedText("PATIENT(M)/61Y\nSpO2: 92%");

    let result = extract_image(&source, &image, &MedicalExtractor::new()).unwrap();
    assert_eq!(result.record.patient.age.as_deref(), Some("61"));
    assert_eq!(result.record.vitals[&Vital::Spo2], "92");
}

#[test]
fn test_extract_image_errors() {
    let image = DynamicImage::new_luma8(8, 8);
    let extractor = MedicalExtractor::new();

    let err = extract_image(&BrokenEngine, &image, &extractor).unwrap_err();
    assert!(matches!(err, MedocrError::Ocr(OcrError::Recognition(_))));

    let err = extract_image(&FixedText("  \n "), &image, &extractor).unwrap_err();
    assert!(matches!(
        err,
        MedocrError::Extraction(ExtractionError::EmptyInput)
    ));
}
