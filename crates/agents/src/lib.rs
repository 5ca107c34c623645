//! Rule-based triage agents.
//!
//! Four independent agents implement `triage_core::Agent`:
//!
//! | agent | reads | produces |
//! |---|---|---|
//! | [`PatientDataAgent`] | every labeled field | a patient summary |
//! | [`DiagnosticAgent`] | `Symptoms:` | an assessment and recommendation |
//! | [`MedicationAgent`] | `Symptoms:`, `Allergies:` | over-the-counter suggestions |
//! | [`ReferralDietAgent`] | `Symptoms:`, `Medical History:` | specialist referrals and a diet plan |
//!
//! Rule tables are built once in each agent's constructor and never mutated.

pub mod diagnostic;
pub mod medication;
pub mod patient;
pub mod referral;

pub use diagnostic::DiagnosticAgent;
pub use medication::MedicationAgent;
pub use patient::PatientDataAgent;
pub use referral::ReferralDietAgent;

use std::sync::Arc;
use triage_core::{Agent, AgentKind, FieldExtractor, FieldPattern, FieldValue, Note};

/// Returned when the note is empty after normalization.
pub const NO_SYMPTOMS_PROVIDED: &str = "No symptoms provided for analysis.";

/// Returned when the note has no `Symptoms:` field.
pub const NO_SYMPTOMS_FOUND: &str = "No symptoms found in the input text.";

/// Construct the agent for a kind.
pub fn build_agent(kind: AgentKind) -> Arc<dyn Agent> {
    match kind {
        AgentKind::PatientData => Arc::new(PatientDataAgent::new()),
        AgentKind::Diagnostic => Arc::new(DiagnosticAgent::new()),
        AgentKind::Medication => Arc::new(MedicationAgent::new()),
        AgentKind::ReferralDiet => Arc::new(ReferralDietAgent::new()),
    }
}

/// One instance of every agent, in default registration order.
pub fn all_agents() -> Vec<Arc<dyn Agent>> {
    AgentKind::ALL.iter().map(|k| build_agent(*k)).collect()
}

/// The single-line `Symptoms:` value the symptom-driven agents work from.
pub(crate) fn symptoms_of(note: &Note) -> Option<String> {
    single_line(note, "Symptoms")
}

/// First-line value of `label`, if present.
pub(crate) fn single_line(note: &Note, label: &str) -> Option<String> {
    match FieldExtractor::extract(note.as_str(), &[FieldPattern::line(label)]) {
        FieldValue::Found(value) => Some(value),
        FieldValue::Unknown => None,
    }
}
