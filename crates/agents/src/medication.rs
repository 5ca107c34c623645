//! Medication agent — suggests over-the-counter medications by symptom
//! category.

use triage_core::{Agent, AgentKind, AgentResult, Note, Rule, RuleTable};

use crate::{NO_SYMPTOMS_FOUND, single_line, symptoms_of};

/// One suggestable medication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Medication {
    pub name: &'static str,
    pub usage: &'static str,
    pub precautions: &'static str,
    pub common_brands: &'static [&'static str],
}

pub const NO_SYMPTOMS_PROVIDED: &str = "No symptoms provided for medication suggestions.";
const NO_SUGGESTIONS: &str = "No specific over-the-counter medications can be suggested for \
     these symptoms. Please consult a healthcare provider for appropriate treatment.";
const IMPORTANT_NOTES: &str = "IMPORTANT NOTES:\n\
     1. These are general suggestions for over-the-counter medications only.\n\
     2. Always consult a healthcare provider before starting any medication.\n\
     3. Check for allergies and drug interactions before use.\n\
     4. Follow package instructions for dosing.";

pub struct MedicationAgent {
    categories: RuleTable<Vec<Medication>>,
}

impl MedicationAgent {
    pub fn new() -> Self {
        Self {
            categories: category_table(),
        }
    }

    /// Medications of every matching category, in category order.
    ///
    /// Categories are not deduplicated against each other, so a medication
    /// listed under two matching categories is suggested twice.
    pub fn suggest(&self, symptoms: &str) -> Vec<&Medication> {
        self.categories
            .matches(symptoms)
            .into_iter()
            .flat_map(|m| m.outcome.iter())
            .collect()
    }
}

impl Default for MedicationAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for MedicationAgent {
    fn name(&self) -> &str {
        AgentKind::Medication.default_name()
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Medication
    }

    fn handle(&self, note: &Note) -> AgentResult {
        if note.is_empty() {
            return AgentResult::text(NO_SYMPTOMS_PROVIDED);
        }
        let Some(symptoms) = symptoms_of(note) else {
            return AgentResult::text(NO_SYMPTOMS_FOUND);
        };

        let medications = self.suggest(&symptoms);
        tracing::debug!(suggested = medications.len(), "Medications matched");
        if medications.is_empty() {
            return AgentResult::text(NO_SUGGESTIONS);
        }

        let mut output = String::from("Medication Suggestions:\n\n");
        for med in &medications {
            output.push_str(&format!(
                "Medication: {}\nUsage: {}\nCommon Brands: {}\nImportant Precautions: {}\n\n",
                med.name,
                med.usage,
                med.common_brands.join(", "),
                med.precautions
            ));
        }

        if let Some(allergies) = single_line(note, "Allergies")
            && !allergies.eq_ignore_ascii_case("none")
        {
            output.push_str(&format!(
                "\nCAUTION: Patient has reported allergies: {allergies}\n\
                 Verify all medications against patient's allergy profile.\n\n"
            ));
        }

        output.push_str(IMPORTANT_NOTES);
        AgentResult::text(output)
    }
}

const ACETAMINOPHEN_BRANDS: &[&str] = &["Tylenol", "Paracetamol"];
const IBUPROFEN_BRANDS: &[&str] = &["Advil", "Motrin"];

fn category_table() -> RuleTable<Vec<Medication>> {
    RuleTable::new(vec![
        // pain
        Rule::new(
            &["pain", "ache", "headache", "migraine"],
            vec![
                Medication {
                    name: "Acetaminophen",
                    usage: "For mild to moderate pain",
                    precautions: "Do not exceed recommended dose. Avoid alcohol.",
                    common_brands: ACETAMINOPHEN_BRANDS,
                },
                Medication {
                    name: "Ibuprofen",
                    usage: "For pain and inflammation",
                    precautions: "Take with food. Not recommended for stomach ulcers.",
                    common_brands: IBUPROFEN_BRANDS,
                },
            ],
        ),
        // allergy
        Rule::new(
            &["allergy", "sneez", "itch", "rash"],
            vec![
                Medication {
                    name: "Cetirizine",
                    usage: "For allergies and hay fever",
                    precautions: "May cause drowsiness",
                    common_brands: &["Zyrtec"],
                },
                Medication {
                    name: "Loratadine",
                    usage: "For allergies",
                    precautions: "Non-drowsy formula",
                    common_brands: &["Claritin"],
                },
            ],
        ),
        // fever
        Rule::new(
            &["fever", "temperature", "hot"],
            vec![
                Medication {
                    name: "Acetaminophen",
                    usage: "For fever reduction",
                    precautions: "Do not exceed recommended dose",
                    common_brands: ACETAMINOPHEN_BRANDS,
                },
                Medication {
                    name: "Ibuprofen",
                    usage: "For fever and inflammation",
                    precautions: "Take with food",
                    common_brands: IBUPROFEN_BRANDS,
                },
            ],
        ),
        // cough
        Rule::new(
            &["cough", "chest", "congestion"],
            vec![
                Medication {
                    name: "Dextromethorphan",
                    usage: "For dry cough",
                    precautions: "May cause drowsiness",
                    common_brands: &["Robitussin", "Delsym"],
                },
                Medication {
                    name: "Guaifenesin",
                    usage: "For wet/productive cough",
                    precautions: "Drink plenty of water",
                    common_brands: &["Mucinex"],
                },
            ],
        ),
    ])
}
