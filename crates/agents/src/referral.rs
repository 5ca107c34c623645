//! Referral and diet agent — specialist referrals plus a dietary plan.

use triage_core::{Agent, AgentKind, AgentResult, Note, Rule, RuleTable};

use crate::{NO_SYMPTOMS_FOUND, NO_SYMPTOMS_PROVIDED, single_line, symptoms_of};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specialist {
    pub specialist: &'static str,
    pub urgency: &'static str,
}

/// A specialist referral for one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Referral {
    pub specialist: &'static str,
    pub urgency: &'static str,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DietPlan {
    pub name: &'static str,
    pub recommended: &'static [&'static str],
    pub avoid: &'static [&'static str],
    pub tips: &'static [&'static str],
}

const NO_REFERRALS: &str = "No immediate specialist referrals needed based on reported symptoms.";
const CLOSING: &str = "Important: These are general recommendations. Please consult with a \
     healthcare provider for personalized advice based on your specific condition.";

pub struct ReferralDietAgent {
    specialists: RuleTable<Specialist>,
    diets: RuleTable<DietPlan>,
    general_diet: DietPlan,
}

impl ReferralDietAgent {
    pub fn new() -> Self {
        Self {
            specialists: specialist_table(),
            diets: diet_table(),
            general_diet: GENERAL_DIET,
        }
    }

    /// Every specialist whose trigger symptoms appear in `text`.
    pub fn referrals(&self, text: &str) -> Vec<Referral> {
        self.specialists
            .matches(text)
            .into_iter()
            .map(|m| Referral {
                specialist: m.outcome.specialist,
                urgency: m.outcome.urgency,
                reason: format!(
                    "Based on reported symptoms: {}",
                    m.matched_keywords.join(", ")
                ),
            })
            .collect()
    }

    /// The first diet plan whose triggers appear in `text`, else the
    /// general plan.
    pub fn diet(&self, text: &str) -> &DietPlan {
        self.diets
            .first_match(text)
            .map(|m| m.outcome)
            .unwrap_or(&self.general_diet)
    }
}

impl Default for ReferralDietAgent {
    fn default() -> Self {
        Self::new()
    }
}

fn bullets(items: &[&str]) -> String {
    format!("- {}", items.join("\n- "))
}

impl Agent for ReferralDietAgent {
    fn name(&self) -> &str {
        AgentKind::ReferralDiet.default_name()
    }

    fn kind(&self) -> AgentKind {
        AgentKind::ReferralDiet
    }

    fn handle(&self, note: &Note) -> AgentResult {
        if note.is_empty() {
            return AgentResult::text(NO_SYMPTOMS_PROVIDED);
        }
        let Some(symptoms) = symptoms_of(note) else {
            return AgentResult::text(NO_SYMPTOMS_FOUND);
        };
        let history = single_line(note, "Medical History").unwrap_or_default();

        // history counts as evidence for referrals and diet alike
        let analysis_text = format!("{symptoms} {history}");
        let referrals = self.referrals(&analysis_text);
        let diet = self.diet(&analysis_text);
        tracing::debug!(referrals = referrals.len(), diet = diet.name, "Referral plan built");

        let mut output = String::from("Referral and Diet Recommendations:\n\n");

        output.push_str("Specialist Referrals:\n");
        if referrals.is_empty() {
            output.push_str(NO_REFERRALS);
            output.push_str("\n\n");
        }
        for referral in &referrals {
            output.push_str(&format!(
                "- {}\n  Urgency: {}\n  Reason: {}\n\n",
                referral.specialist, referral.urgency, referral.reason
            ));
        }

        output.push_str("Dietary Recommendations:\n");
        output.push_str(&format!("Recommended Foods:\n{}\n\n", bullets(diet.recommended)));
        output.push_str(&format!("Foods to Avoid:\n{}\n\n", bullets(diet.avoid)));
        output.push_str(&format!("Dietary Tips:\n{}\n\n", bullets(diet.tips)));

        if !history.is_empty() && !history.eq_ignore_ascii_case("none") {
            output.push_str(&format!(
                "Note: These recommendations take into account your medical history of: {history}\n\n"
            ));
        }

        output.push_str(CLOSING);
        AgentResult::text(output)
    }
}

fn specialist_table() -> RuleTable<Specialist> {
    RuleTable::new(vec![
        Rule::new(
            &["chest pain", "shortness of breath", "palpitations", "high blood pressure"],
            Specialist {
                specialist: "Cardiologist",
                urgency: "Urgent - Schedule within 1-2 weeks",
            },
        ),
        Rule::new(
            &["joint pain", "swelling", "morning stiffness", "arthritis"],
            Specialist {
                specialist: "Rheumatologist",
                urgency: "Non-urgent - Schedule within 4-6 weeks",
            },
        ),
        Rule::new(
            &["rash", "skin changes", "suspicious moles", "severe acne"],
            Specialist {
                specialist: "Dermatologist",
                urgency: "Routine - Schedule within 4-8 weeks",
            },
        ),
        Rule::new(
            &["abdominal pain", "chronic diarrhea", "blood in stool", "acid reflux"],
            Specialist {
                specialist: "Gastroenterologist",
                urgency: "Semi-urgent - Schedule within 2-4 weeks",
            },
        ),
        Rule::new(
            &["headaches", "dizziness", "numbness", "seizures"],
            Specialist {
                specialist: "Neurologist",
                urgency: "Varies - Depends on symptoms",
            },
        ),
    ])
}

const GENERAL_DIET: DietPlan = DietPlan {
    name: "general",
    recommended: &["fruits", "vegetables", "whole grains", "lean proteins"],
    avoid: &["excess sugar", "processed foods", "excessive alcohol"],
    tips: &[
        "Stay hydrated",
        "Eat a variety of colorful foods",
        "Practice portion control",
        "Listen to your body's hunger cues",
    ],
};

fn diet_table() -> RuleTable<DietPlan> {
    RuleTable::new(vec![
        Rule::new(
            &["chest pain", "high blood pressure", "heart"],
            DietPlan {
                name: "heart",
                recommended: &["fruits", "vegetables", "whole grains", "lean proteins", "fish"],
                avoid: &["saturated fats", "excess salt", "processed foods"],
                tips: &[
                    "Follow a Mediterranean-style diet",
                    "Limit red meat consumption",
                    "Choose low-sodium options",
                    "Include omega-3 rich foods",
                ],
            },
        ),
        Rule::new(
            &["blood sugar", "diabetes", "thirst"],
            DietPlan {
                name: "diabetes",
                recommended: &["high-fiber foods", "lean proteins", "healthy fats", "low-glycemic carbs"],
                avoid: &["sugary drinks", "processed snacks", "white bread", "candy"],
                tips: &[
                    "Monitor carbohydrate intake",
                    "Eat regular, balanced meals",
                    "Choose whole grains over refined grains",
                    "Include protein with each meal",
                ],
            },
        ),
        Rule::new(
            &["stomach", "digestive", "nausea"],
            DietPlan {
                name: "digestive",
                recommended: &["yogurt", "fiber-rich foods", "cooked vegetables", "lean proteins"],
                avoid: &["spicy foods", "fatty foods", "caffeine", "alcohol"],
                tips: &[
                    "Eat smaller, frequent meals",
                    "Stay well hydrated",
                    "Chew food thoroughly",
                    "Avoid lying down after meals",
                ],
            },
        ),
    ])
}
