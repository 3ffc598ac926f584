//! Per-chat session state

use crate::risk::QUESTION_COUNT;

/// Which flow a session is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveFlow {
    None,
    RiskQuiz,
    Report,
}

/// Conversation state for one chat
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConvState {
    /// No flow active, inbound text goes to the menu router
    #[default]
    Idle,

    /// Asking quiz questions. The current question index is `answers.len()`.
    RiskQuiz {
        /// Raw answer texts, in question order
        answers: Vec<String>,
    },

    /// Next inbound text is taken as the report body
    AwaitingReport,
}

impl ConvState {
    pub fn active_flow(&self) -> ActiveFlow {
        match self {
            ConvState::Idle => ActiveFlow::None,
            ConvState::RiskQuiz { .. } => ActiveFlow::RiskQuiz,
            ConvState::AwaitingReport => ActiveFlow::Report,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ConvState::Idle)
    }

    /// Index of the question being asked, 0 outside the quiz
    pub fn current_question_index(&self) -> usize {
        match self {
            ConvState::RiskQuiz { answers } => answers.len(),
            _ => 0,
        }
    }

    /// Collected quiz answers, empty outside the quiz
    pub fn collected_answers(&self) -> &[String] {
        match self {
            ConvState::RiskQuiz { answers } => answers,
            _ => &[],
        }
    }

    /// A quiz session never holds a full answer set: the last answer
    /// triggers scoring and ends the flow.
    pub fn is_valid(&self) -> bool {
        self.collected_answers().len() < QUESTION_COUNT
    }
}
