//! Diagnostic agent — maps reported symptoms to candidate conditions.

use triage_core::{Agent, AgentKind, AgentResult, Note, Rule, RuleTable};

use crate::{NO_SYMPTOMS_FOUND, NO_SYMPTOMS_PROVIDED, symptoms_of};

/// A condition the agent can suggest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub diagnosis: &'static str,
    pub recommendation: &'static str,
}

/// Assessment produced for one symptom string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub diagnosis: String,
    pub recommendation: String,
}

const NON_SPECIFIC_DIAGNOSIS: &str = "Non-specific symptoms detected";
const NON_SPECIFIC_RECOMMENDATION: &str =
    "Please consult a healthcare provider for a thorough evaluation.";
const MULTIPLE_PREFIX: &str = "Multiple conditions possible: ";
const MULTIPLE_RECOMMENDATION: &str = "IMPORTANT: Multiple health concerns identified. \
     Please seek medical attention for a comprehensive evaluation.";
const DISCLAIMER: &str =
    "Note: This is an automated analysis and should not replace professional medical advice.";

pub struct DiagnosticAgent {
    conditions: RuleTable<Condition>,
}

impl DiagnosticAgent {
    pub fn new() -> Self {
        Self {
            conditions: condition_table(),
        }
    }

    /// Match `symptoms` against the condition table.
    ///
    /// A single match is reported verbatim. Several matches collapse into one
    /// "multiple conditions" assessment carrying every diagnosis but only the
    /// generic recommendation.
    pub fn assess(&self, symptoms: &str) -> Assessment {
        let matches = self.conditions.matches(symptoms);
        match matches.as_slice() {
            [] => Assessment {
                diagnosis: NON_SPECIFIC_DIAGNOSIS.into(),
                recommendation: NON_SPECIFIC_RECOMMENDATION.into(),
            },
            [only] => Assessment {
                diagnosis: only.outcome.diagnosis.into(),
                recommendation: only.outcome.recommendation.into(),
            },
            many => {
                let diagnoses: Vec<&str> = many.iter().map(|m| m.outcome.diagnosis).collect();
                Assessment {
                    diagnosis: format!("{MULTIPLE_PREFIX}{}", diagnoses.join("; ")),
                    recommendation: MULTIPLE_RECOMMENDATION.into(),
                }
            }
        }
    }
}

impl Default for DiagnosticAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for DiagnosticAgent {
    fn name(&self) -> &str {
        AgentKind::Diagnostic.default_name()
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Diagnostic
    }

    fn handle(&self, note: &Note) -> AgentResult {
        if note.is_empty() {
            return AgentResult::text(NO_SYMPTOMS_PROVIDED);
        }
        let Some(symptoms) = symptoms_of(note) else {
            return AgentResult::text(NO_SYMPTOMS_FOUND);
        };

        let assessment = self.assess(&symptoms);
        tracing::debug!(diagnosis = %assessment.diagnosis, "Symptoms assessed");

        AgentResult::text(format!(
            "Diagnostic Analysis:\n\n\
             Assessment: {}\n\n\
             Recommendations: {}\n\n\
             {DISCLAIMER}",
            assessment.diagnosis, assessment.recommendation
        ))
    }
}

fn condition_table() -> RuleTable<Condition> {
    RuleTable::new(vec![
        Rule::new(
            &["chest pain", "shortness of breath"],
            Condition {
                diagnosis: "Possible cardiovascular condition requiring immediate attention",
                recommendation: "URGENT: Seek emergency medical care immediately. \
                                 These symptoms could indicate a serious heart condition.",
            },
        ),
        Rule::new(
            &["fever", "cough", "fatigue", "loss of taste", "loss of smell"],
            Condition {
                diagnosis: "Possible respiratory infection",
                recommendation: "Self-isolate and contact healthcare provider for testing and evaluation.",
            },
        ),
        Rule::new(
            &["headache", "nausea", "sensitivity to light", "visual disturbances"],
            Condition {
                diagnosis: "Possible migraine condition",
                recommendation: "Rest in a dark, quiet room. Take prescribed migraine medication \
                                 if available. If symptoms persist or worsen, consult a neurologist.",
            },
        ),
        Rule::new(
            &["joint pain", "swelling", "morning stiffness", "fatigue"],
            Condition {
                diagnosis: "Possible inflammatory arthritis",
                recommendation: "Schedule an appointment with a rheumatologist. \
                                 Keep track of affected joints and timing of symptoms.",
            },
        ),
        Rule::new(
            &["abdominal pain", "nausea", "vomiting", "diarrhea"],
            Condition {
                diagnosis: "Possible gastrointestinal condition",
                recommendation: "Stay hydrated, rest, and follow the BRAT diet. \
                                 Seek medical attention if symptoms persist or worsen.",
            },
        ),
        Rule::new(
            &["increased thirst", "frequent urination", "fatigue", "blurred vision"],
            Condition {
                diagnosis: "Possible diabetes",
                recommendation: "Schedule an appointment for blood sugar testing. \
                                 Monitor fluid intake and urination frequency.",
            },
        ),
        Rule::new(
            &["rash", "itching", "swelling", "difficulty breathing"],
            Condition {
                diagnosis: "Possible allergic reaction",
                recommendation: "URGENT: If breathing is affected, seek emergency care. \
                                 Otherwise, take antihistamines and monitor symptoms.",
            },
        ),
        Rule::new(
            &["dizziness", "balance problems", "hearing changes", "ringing in ears"],
            Condition {
                diagnosis: "Possible inner ear or vestibular condition",
                recommendation: "Consult an ENT specialist. \
                                 Avoid sudden movements and keep track of trigger factors.",
            },
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardiovascular_single_match_is_verbatim() {
        let agent = DiagnosticAgent::new();
        let result = agent.handle(&Note::new("Symptoms: chest pain, shortness of breath"));
        let text = result.as_text();
        assert!(text.starts_with("Diagnostic Analysis:\n\n"));
        assert!(text.contains(
            "Assessment: Possible cardiovascular condition requiring immediate attention\n\n"
        ));
        assert!(text.contains(
            "Recommendations: URGENT: Seek emergency medical care immediately. \
             These symptoms could indicate a serious heart condition.\n\n"
        ));
        assert!(text.ends_with(DISCLAIMER));
    }

    #[test]
    fn two_matching_rules_take_the_multiple_conditions_path() {
        let agent = DiagnosticAgent::new();
        let assessment = agent.assess("fever, chest pain");
        assert_eq!(
            assessment.diagnosis,
            "Multiple conditions possible: \
             Possible cardiovascular condition requiring immediate attention; \
             Possible respiratory infection"
        );
        assert_eq!(assessment.recommendation, MULTIPLE_RECOMMENDATION);
    }

    #[test]
    fn shared_keyword_fires_every_rule_containing_it() {
        // "fatigue" belongs to respiratory, arthritis and diabetes rules
        let assessment = DiagnosticAgent::new().assess("fatigue");
        assert_eq!(assessment.diagnosis.matches("; ").count(), 2);
    }

    #[test]
    fn no_match_falls_back_to_non_specific() {
        let assessment = DiagnosticAgent::new().assess("sprained ankle");
        assert_eq!(assessment.diagnosis, NON_SPECIFIC_DIAGNOSIS);
        assert_eq!(assessment.recommendation, NON_SPECIFIC_RECOMMENDATION);
    }

    #[test]
    fn uppercase_symptoms_still_match() {
        let assessment = DiagnosticAgent::new().assess("HEADACHE present");
        assert_eq!(assessment.diagnosis, "Possible migraine condition");
    }

    #[test]
    fn soft_failures_are_plain_results() {
        let agent = DiagnosticAgent::new();
        assert_eq!(agent.handle_text("  ").as_text(), NO_SYMPTOMS_PROVIDED);
        assert_eq!(agent.handle_text("Name: Ann").as_text(), NO_SYMPTOMS_FOUND);
    }

    #[test]
    fn only_the_first_symptoms_line_is_assessed() {
        let result = DiagnosticAgent::new().handle_text("Symptoms: rash\\nchest pain");
        assert!(result.as_text().contains("Possible allergic reaction"));
        assert!(!result.as_text().contains("cardiovascular"));
    }
}
