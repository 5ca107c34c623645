//! Agent trait — the single capability every triage agent offers.
//!
//! An agent is a stateless handler holding read-only rule tables. Given a
//! normalized [`Note`] it produces an [`AgentResult`]. Domain-level "nothing
//! found" outcomes are returned as ordinary results carrying guidance text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::note::Note;

/// The core Agent trait.
///
/// Implementations must be pure with respect to their input: the same note
/// always yields the same result, and no state is shared between calls.
pub trait Agent: Send + Sync {
    /// Registration name used by the coordinator (e.g. "diagnostic").
    fn name(&self) -> &str;

    /// Which of the four agent variants this is.
    fn kind(&self) -> AgentKind;

    /// Produce a result for one note.
    fn handle(&self, note: &Note) -> AgentResult;

    /// Normalize raw text and handle it.
    fn handle_text(&self, raw: &str) -> AgentResult {
        self.handle(&Note::new(raw))
    }
}

/// The four agent variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    PatientData,
    Diagnostic,
    Medication,
    ReferralDiet,
}

impl AgentKind {
    /// All variants, in the default registration order.
    pub const ALL: [AgentKind; 4] = [
        AgentKind::PatientData,
        AgentKind::Diagnostic,
        AgentKind::Medication,
        AgentKind::ReferralDiet,
    ];

    /// Name the coordinator registers this agent under by default.
    pub fn default_name(self) -> &'static str {
        match self {
            AgentKind::PatientData => "patient_info",
            AgentKind::Diagnostic => "diagnostic",
            AgentKind::Medication => "medication",
            AgentKind::ReferralDiet => "referral_diet",
        }
    }

    /// Identity reported by the service wrapper's health probe.
    pub fn type_name(self) -> &'static str {
        match self {
            AgentKind::PatientData => "PatientDataAgent",
            AgentKind::Diagnostic => "DiagnosticAgent",
            AgentKind::Medication => "MedicationAgent",
            AgentKind::ReferralDiet => "ReferralAndDietAgent",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            AgentKind::PatientData => 5001,
            AgentKind::Diagnostic => 5002,
            AgentKind::Medication => 5003,
            AgentKind::ReferralDiet => 5004,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::PatientData => "patient_data",
            AgentKind::Diagnostic => "diagnostic",
            AgentKind::Medication => "medication",
            AgentKind::ReferralDiet => "referral_diet",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "patient_data" | "patient_info" | "patient" => Ok(AgentKind::PatientData),
            "diagnostic" => Ok(AgentKind::Diagnostic),
            "medication" => Ok(AgentKind::Medication),
            "referral_diet" | "referral" => Ok(AgentKind::ReferralDiet),
            other => Err(format!(
                "unknown agent kind '{other}' (expected patient_data, diagnostic, medication or referral_diet)"
            )),
        }
    }
}

/// Kind of payload an agent returned.
///
/// Local agents always answer with `text`; downstream services may report
/// anything, and the coordinator passes it through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    Text,
    Structured,
    Other(String),
}

impl From<String> for ContentType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "text" => ContentType::Text,
            "structured" => ContentType::Structured,
            _ => ContentType::Other(s),
        }
    }
}

impl From<ContentType> for String {
    fn from(kind: ContentType) -> Self {
        match kind {
            ContentType::Text => "text".into(),
            ContentType::Structured => "structured".into(),
            ContentType::Other(s) => s,
        }
    }
}

/// Payload of an agent response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentContent {
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub text: String,
    /// Fields a remote service sent beyond `type` and `text`, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The uniform result every agent returns.
///
/// Serializes to the wire shape `{"content": {"type": ..., "text": ...}}`.
/// Unknown fields survive a decode/encode cycle, so the coordinator relays
/// a remote service's response untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub content: AgentContent,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AgentResult {
    /// A plain text result.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: AgentContent {
                kind: ContentType::Text,
                text: text.into(),
                extra: serde_json::Map::new(),
            },
            extra: serde_json::Map::new(),
        }
    }

    pub fn kind(&self) -> &ContentType {
        &self.content.kind
    }

    pub fn as_text(&self) -> &str {
        &self.content.text
    }
}

/// One entry of an aggregate: which agent answered, and what it said.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReply {
    pub agent_name: String,
    pub response: AgentResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoAgent;

    impl Agent for EchoAgent {
        fn name(&self) -> &str {
            "echo"
        }
        fn kind(&self) -> AgentKind {
            AgentKind::PatientData
        }
        fn handle(&self, note: &Note) -> AgentResult {
            AgentResult::text(note.as_str())
        }
    }

    #[test]
    fn handle_text_normalizes_first() {
        let result = EchoAgent.handle_text("  a\\nb ");
        assert_eq!(result.as_text(), "a\nb");
    }

    #[test]
    fn result_serializes_to_wire_shape() {
        let json = serde_json::to_value(AgentResult::text("hello")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"content": {"type": "text", "text": "hello"}})
        );
    }

    #[test]
    fn unknown_content_type_is_preserved() {
        let result: AgentResult =
            serde_json::from_str(r#"{"content": {"type": "markdown", "text": "x"}}"#).unwrap();
        assert_eq!(result.kind(), &ContentType::Other("markdown".into()));
        let back = serde_json::to_value(&result).unwrap();
        assert_eq!(back["content"]["type"], "markdown");
    }

    #[test]
    fn extra_fields_pass_through_untouched() {
        let wire = serde_json::json!({
            "content": {"type": "text", "text": "x", "confidence": 0.8},
            "trace_id": "abc-123"
        });
        let result: AgentResult = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(result.as_text(), "x");
        assert_eq!(serde_json::to_value(&result).unwrap(), wire);
    }

    #[test]
    fn kind_parses_from_names_and_aliases() {
        assert_eq!("referral-diet".parse::<AgentKind>(), Ok(AgentKind::ReferralDiet));
        assert_eq!("patient_info".parse::<AgentKind>(), Ok(AgentKind::PatientData));
        assert!("oracle".parse::<AgentKind>().is_err());
    }

    #[test]
    fn default_ports_are_distinct() {
        let ports: std::collections::HashSet<u16> =
            AgentKind::ALL.iter().map(|k| k.default_port()).collect();
        assert_eq!(ports.len(), AgentKind::ALL.len());
    }
}
