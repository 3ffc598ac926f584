//! Sinkhole risk scoring
//!
//! Four yes/no questions, each with a weight. The score is the sum of the
//! weights of the affirmative answers and maps onto three fixed tiers.

/// A quiz question with its weight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskQuestion {
    pub prompt: &'static str,
    pub weight: u32,
}

pub const RISK_QUESTIONS: [RiskQuestion; 4] = [
    RiskQuestion {
        prompt: "¿Ha notado GRIETAS en el suelo o paredes? (sí/no)",
        weight: 4,
    },
    RiskQuestion {
        prompt: "¿Ha observado FUGAS DE AGUA en tuberías o calles? (sí/no)",
        weight: 3,
    },
    RiskQuestion {
        prompt: "¿El suelo se ha HUNDIDO visiblemente? (sí/no)",
        weight: 4,
    },
    RiskQuestion {
        prompt: "¿Ha llovido FUERTEMENTE en los últimos 3 días? (sí/no)",
        weight: 1,
    },
];

pub const QUESTION_COUNT: usize = RISK_QUESTIONS.len();

/// Score with every answer affirmative
pub const MAX_SCORE: u32 = 12;

/// Scores at or above this are HIGH
pub const HIGH_THRESHOLD: u32 = 7;
/// Scores at or above this (and below `HIGH_THRESHOLD`) are MEDIUM
pub const MEDIUM_THRESHOLD: u32 = 4;

const AFFIRMATIVE: [&str; 5] = ["sí", "si", "s", "yes", "y"];
const NEGATIVE: [&str; 2] = ["no", "n"];

/// Classified quiz answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    /// Case-insensitive match against the recognized tokens, ignoring
    /// surrounding whitespace. Anything else is `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let token = text.trim().to_lowercase();
        if AFFIRMATIVE.contains(&token.as_str()) {
            Some(Answer::Yes)
        } else if NEGATIVE.contains(&token.as_str()) {
            Some(Answer::No)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn from_score(score: u32) -> Self {
        if score >= HIGH_THRESHOLD {
            RiskTier::High
        } else if score >= MEDIUM_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "🟢 RIESGO BAJO",
            RiskTier::Medium => "🟡 RIESGO MEDIO",
            RiskTier::High => "🔴 ALTO RIESGO",
        }
    }
}

/// Outcome of a completed quiz. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskResult {
    pub tier: RiskTier,
    pub score: u32,
    pub headline: &'static str,
    pub actions: &'static [&'static str],
}

impl RiskResult {
    pub fn for_score(score: u32) -> Self {
        let tier = RiskTier::from_score(score);
        let (headline, actions): (&'static str, &'static [&'static str]) = match tier {
            RiskTier::High => (
                "PELIGRO INMINENTE - Evacue el área y contacte a Protección Civil inmediatamente",
                &[
                    "Aléjese del área inmediatamente",
                    "Llame a Protección Civil: 555-123-4567",
                    "Alerte a sus vecinos",
                    "No permita el paso de personas o vehículos",
                ],
            ),
            RiskTier::Medium => (
                "ZONA DE PRECAUCIÓN - Monitoree constantemente y reporte cambios",
                &[
                    "Evite transitar por la zona afectada",
                    "Reporte a las autoridades locales",
                    "Tome fotografías de seguimiento",
                    "Esté alerta a nuevas grietas o hundimientos",
                ],
            ),
            RiskTier::Low => (
                "SITUACIÓN ESTABLE - Manténgase informado y alerta",
                &[
                    "Continúe con la observación regular",
                    "Conozca los números de emergencia",
                    "Reporte cualquier cambio sospechoso",
                    "Comparta información con sus vecinos",
                ],
            ),
        };
        Self {
            tier,
            score,
            headline,
            actions,
        }
    }
}

/// Weighted sum over raw answers. Negative or unrecognized answers add 0,
/// and answers beyond the question count are ignored.
pub fn score<S: AsRef<str>>(answers: &[S]) -> u32 {
    RISK_QUESTIONS
        .iter()
        .zip(answers)
        .filter(|(_, answer)| Answer::parse(answer.as_ref()) == Some(Answer::Yes))
        .map(|(question, _)| question.weight)
        .sum()
}

pub fn assess<S: AsRef<str>>(answers: &[S]) -> RiskResult {
    RiskResult::for_score(score(answers))
}
