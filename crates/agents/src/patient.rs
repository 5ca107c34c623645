//! Patient data agent — pulls labeled fields out of the note and renders a
//! summary.

use triage_core::{
    Agent, AgentKind, AgentResult, ExtractedField, FieldExtractor, FieldPattern, FieldValue, Note,
};

/// Labels that end a multi-line block when they start a line.
const SYMPTOMS_STOPS: &[&str] = &["Medical History", "Allergies", "Current Medications"];
const HISTORY_STOPS: &[&str] = &["Symptoms", "Allergies", "Current Medications"];
const ALLERGIES_STOPS: &[&str] = &["Medical History", "Symptoms", "Current Medications"];
const MEDICATIONS_STOPS: &[&str] = &["Medical History", "Allergies", "Symptoms"];

/// Extracts name, age, body measurements, symptoms, history, allergies and
/// current medications.
pub struct PatientDataAgent {
    extractor: FieldExtractor,
}

impl PatientDataAgent {
    pub fn new() -> Self {
        let extractor = FieldExtractor::new()
            .field(
                "Name",
                vec![FieldPattern::line("Patient Name"), FieldPattern::line("Name")],
            )
            .field("Age", vec![FieldPattern::digits("Age")])
            .field("Weight", vec![FieldPattern::line("Weight")])
            .field("Height", vec![FieldPattern::line("Height")])
            .field(
                "Symptoms",
                vec![
                    FieldPattern::block("Symptoms", SYMPTOMS_STOPS),
                    FieldPattern::block("Current Problems", SYMPTOMS_STOPS),
                ],
            )
            .field(
                "Medical History",
                vec![FieldPattern::block("Medical History", HISTORY_STOPS)],
            )
            .field(
                "Allergies",
                vec![FieldPattern::block("Allergies", ALLERGIES_STOPS)],
            )
            .field(
                "Current Medications",
                vec![FieldPattern::block("Current Medications", MEDICATIONS_STOPS)],
            );
        Self { extractor }
    }

    /// All fields, in summary order.
    pub fn extract(&self, note: &Note) -> Vec<ExtractedField> {
        self.extractor.extract_all(note.as_str())
    }
}

impl Default for PatientDataAgent {
    fn default() -> Self {
        Self::new()
    }
}

/// `Name: value`, or a bulleted list when the value spans several lines.
fn format_field(field: &ExtractedField) -> String {
    match &field.value {
        FieldValue::Found(value) if value.contains('\n') => {
            let bullets: Vec<String> = value.lines().map(|l| format!("- {l}")).collect();
            format!("{}:\n{}", field.name, bullets.join("\n"))
        }
        value => format!("{}: {value}", field.name),
    }
}

impl Agent for PatientDataAgent {
    fn name(&self) -> &str {
        AgentKind::PatientData.default_name()
    }

    fn kind(&self) -> AgentKind {
        AgentKind::PatientData
    }

    fn handle(&self, note: &Note) -> AgentResult {
        let fields = self.extract(note);
        let found = fields.iter().filter(|f| !f.value.is_unknown()).count();
        tracing::debug!(found, total = fields.len(), "Patient fields extracted");

        let mut sections = vec!["Patient Summary:".to_string()];
        sections.extend(fields.iter().map(format_field));
        AgentResult::text(sections.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTE: &str = "Patient Name: John Smith\n\
                        Age: 45 years\n\
                        Weight: 80 kg\n\
                        Symptoms: chest pain\n\
                        shortness of breath\n\
                        chest pain\n\
                        Medical History: hypertension\n\
                        Allergies: penicillin\n\
                        Current Medications: lisinopril";

    fn value_of(fields: &[ExtractedField], name: &str) -> FieldValue {
        fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.clone())
            .unwrap()
    }

    #[test]
    fn extracts_labeled_fields() {
        let fields = PatientDataAgent::new().extract(&Note::new(NOTE));
        assert_eq!(value_of(&fields, "Name"), FieldValue::Found("John Smith".into()));
        assert_eq!(value_of(&fields, "Age"), FieldValue::Found("45".into()));
        assert_eq!(value_of(&fields, "Height"), FieldValue::Unknown);
        assert_eq!(
            value_of(&fields, "Symptoms"),
            FieldValue::Found("chest pain\nshortness of breath".into())
        );
        assert_eq!(
            value_of(&fields, "Medical History"),
            FieldValue::Found("hypertension".into())
        );
    }

    #[test]
    fn current_problems_is_a_symptoms_fallback() {
        let fields = PatientDataAgent::new().extract(&Note::new("Current Problems: back pain"));
        assert_eq!(value_of(&fields, "Symptoms"), FieldValue::Found("back pain".into()));
    }

    #[test]
    fn summary_renders_multiline_values_as_bullets() {
        let result = PatientDataAgent::new().handle(&Note::new(NOTE));
        let text = result.as_text();
        assert!(text.starts_with("Patient Summary:\nName: John Smith\nAge: 45\n"));
        assert!(text.contains("Symptoms:\n- chest pain\n- shortness of breath\nMedical History:"));
        assert!(text.contains("Height: N/A"));
        assert!(text.ends_with("Current Medications: lisinopril"));
    }

    #[test]
    fn empty_note_yields_all_unknown_summary() {
        let result = PatientDataAgent::new().handle_text("   ");
        let lines: Vec<&str> = result.as_text().lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[1..].iter().all(|l| l.ends_with(": N/A")));
    }
}
