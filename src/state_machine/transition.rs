//! Pure state transition function
//!
//! Given the same state and event this always produces the same result.
//! All I/O (message delivery, report logging) is expressed as effects.

use super::{ConvState, Effect, Event};
use crate::content::{self, MenuOption};
use crate::risk::{self, Answer, RiskTier, QUESTION_COUNT};

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Pure transition function. Every (state, event) pair is defined.
pub fn transition(state: &ConvState, event: Event) -> TransitionResult {
    match (state, event) {
        // ============================================================
        // Global commands
        // ============================================================
        (_, Event::Start) => {
            TransitionResult::new(ConvState::Idle).with_effect(Effect::reply_with_menu(content::WELCOME))
        }

        (_, Event::Cancel) => {
            TransitionResult::new(ConvState::Idle).with_effect(Effect::reply(content::CANCELLED))
        }

        (state, Event::UnknownCommand { .. }) => TransitionResult::new(state.clone()),

        // ============================================================
        // Menu router
        // ============================================================
        (ConvState::Idle, Event::Text { text }) => route_menu(&text),

        // ============================================================
        // Risk quiz
        // ============================================================
        (ConvState::RiskQuiz { answers }, Event::Text { text }) => answer_question(answers, text),

        // ============================================================
        // Report
        // ============================================================
        (ConvState::AwaitingReport, Event::Text { text }) => {
            let acks = content::report_received(&text);
            acks.into_iter().fold(
                TransitionResult::new(ConvState::Idle).with_effect(Effect::RecordReport { text }),
                |result, ack| result.with_effect(Effect::reply(ack)),
            )
        }
    }
}

fn route_menu(text: &str) -> TransitionResult {
    let Some(option) = MenuOption::from_label(text) else {
        return TransitionResult::new(ConvState::Idle).with_effect(Effect::reply(content::USE_MENU));
    };

    match option {
        MenuOption::RiskQuiz => TransitionResult::new(ConvState::RiskQuiz { answers: vec![] })
            .with_effect(Effect::reply(content::quiz_intro())),
        MenuOption::EmergencyNumbers => {
            TransitionResult::new(ConvState::Idle).with_effect(Effect::reply(content::emergency_numbers()))
        }
        MenuOption::Report => TransitionResult::new(ConvState::AwaitingReport)
            .with_effect(Effect::reply(content::REPORT_INSTRUCTIONS)),
        MenuOption::HazardInfo => {
            TransitionResult::new(ConvState::Idle).with_effect(Effect::reply(content::HAZARD_INFO))
        }
        MenuOption::ImmediateHelp => {
            TransitionResult::new(ConvState::Idle).with_effect(Effect::reply(content::IMMEDIATE_HELP))
        }
    }
}

fn answer_question(answers: &[String], text: String) -> TransitionResult {
    let index = answers.len();

    if Answer::parse(&text).is_none() {
        return TransitionResult::new(ConvState::RiskQuiz {
            answers: answers.to_vec(),
        })
        .with_effect(Effect::reply(content::invalid_answer(index)));
    }

    let mut answers = answers.to_vec();
    answers.push(text);

    if answers.len() < QUESTION_COUNT {
        let next = answers.len();
        return TransitionResult::new(ConvState::RiskQuiz { answers })
            .with_effect(Effect::reply(content::question(next)));
    }

    let result = risk::assess(&answers);
    let mut outcome =
        TransitionResult::new(ConvState::Idle).with_effect(Effect::reply(content::risk_result(&result)));
    if result.tier == RiskTier::High {
        outcome = outcome.with_effect(Effect::reply(content::emergency_numbers()));
    }
    outcome
}
