//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::transition::TransitionResult;
use super::*;
use crate::content::{self, MenuOption, LABEL_CANCEL};
use crate::risk::{self, Answer, RiskTier, QUESTION_COUNT, RISK_QUESTIONS};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_affirmative() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("sí"),
        Just("si"),
        Just("s"),
        Just("yes"),
        Just("y"),
        Just("SÍ"),
        Just("Si"),
        Just("YES"),
        Just("Y"),
    ]
    .prop_map(String::from)
}

fn arb_negative() -> impl Strategy<Value = String> {
    prop_oneof![Just("no"), Just("n"), Just("NO"), Just("No"), Just("N")].prop_map(String::from)
}

fn arb_valid_answer() -> impl Strategy<Value = String> {
    prop_oneof![arb_affirmative(), arb_negative()]
}

/// Text that is neither a yes/no token nor a command
fn arb_invalid_answer() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,20}".prop_filter("must not be a yes/no token", |t| Answer::parse(t).is_none())
}

fn arb_menu_label() -> impl Strategy<Value = String> {
    prop::sample::select(MenuOption::ALL.to_vec()).prop_map(|option| option.label().to_string())
}

fn arb_text_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_valid_answer(),
        arb_invalid_answer(),
        arb_menu_label(),
        "[a-zA-Z ,.]{1,40}",
    ]
    .prop_map(|text| Event::Text { text })
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        4 => arb_text_event(),
        1 => Just(Event::Start),
        1 => Just(Event::Cancel),
        1 => "[a-z]{1,10}".prop_map(|command| Event::UnknownCommand { command }),
    ]
}

fn arb_quiz_state() -> impl Strategy<Value = ConvState> {
    proptest::collection::vec(arb_valid_answer(), 0..QUESTION_COUNT)
        .prop_map(|answers| ConvState::RiskQuiz { answers })
}

fn arb_state() -> impl Strategy<Value = ConvState> {
    prop_oneof![
        Just(ConvState::Idle),
        Just(ConvState::AwaitingReport),
        arb_quiz_state(),
    ]
}

/// Report bodies heavy in Markdown markers, backslashes and non-ASCII text
fn arb_report_text() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-zA-Z0-9 ,.#\"_*`\\[\\]\\\\ñáéíóúü😀\n-]{0,200}",
        1 => any::<String>(),
        1 => "[a-z_*]{3000,4500}",
    ]
}

/// The echoed report as sent: the quoted segment of a single acknowledgment,
/// or every message before the final acknowledgment when it was split
fn rendered_echo(replies: &[&str]) -> String {
    const OPEN: &str = "*Su reporte ha sido recibido:*\n\"";
    const CLOSE: &str = "\"\n\n*📞";

    if let [single] = replies {
        let start = single.find(OPEN).map_or(0, |i| i + OPEN.len());
        let end = single.rfind(CLOSE).unwrap_or(single.len());
        return single.get(start..end).unwrap_or_default().to_string();
    }
    replies[..replies.len() - 1].concat()
}

fn run_answers(answers: &[String]) -> TransitionResult {
    let mut result = transition(
        &ConvState::Idle,
        Event::Text {
            text: content::LABEL_RISK_QUIZ.to_string(),
        },
    );
    for answer in answers {
        result = transition(
            &result.new_state,
            Event::Text {
                text: answer.clone(),
            },
        );
    }
    result
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: A quiz session never holds a full answer set
    #[test]
    fn prop_transitions_preserve_validity(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut state = ConvState::Idle;
        for event in events {
            let result = transition(&state, event);
            state = result.new_state;
            prop_assert!(state.is_valid(), "Invalid state: {:?}", state);
        }
    }

    // Invariant 2: Score is the weighted sum of affirmative answers
    #[test]
    fn prop_score_is_weighted_sum(answers in proptest::collection::vec(arb_valid_answer(), QUESTION_COUNT)) {
        let expected: u32 = RISK_QUESTIONS
            .iter()
            .zip(&answers)
            .filter(|(_, a)| Answer::parse(a) == Some(Answer::Yes))
            .map(|(q, _)| q.weight)
            .sum();
        let score = risk::score(&answers);
        prop_assert_eq!(score, expected);

        let tier = RiskTier::from_score(score);
        prop_assert_eq!(tier == RiskTier::High, score >= 7);
        prop_assert_eq!(tier == RiskTier::Medium, (4..7).contains(&score));
        prop_assert_eq!(tier == RiskTier::Low, score < 4);
    }

    // Invariant 3: Four valid answers end the quiz, and only HIGH adds the emergency list
    #[test]
    fn prop_completed_quiz_returns_to_idle(answers in proptest::collection::vec(arb_valid_answer(), QUESTION_COUNT)) {
        let result = run_answers(&answers);
        prop_assert_eq!(&result.new_state, &ConvState::Idle);

        let tier = risk::assess(&answers).tier;
        let replies: Vec<&str> = result.effects.iter().filter_map(Effect::reply_text).collect();
        if tier == RiskTier::High {
            prop_assert_eq!(replies.len(), 2);
            prop_assert_eq!(replies[1], content::emergency_numbers());
        } else {
            prop_assert_eq!(replies.len(), 1);
        }
        prop_assert!(replies[0].contains(tier.label()));
    }

    // Invariant 4: Invalid answers leave the quiz untouched and repeat the question
    #[test]
    fn prop_invalid_answer_keeps_state(state in arb_quiz_state(), text in arb_invalid_answer()) {
        let index = state.current_question_index();
        let result = transition(&state, Event::Text { text });
        prop_assert_eq!(&result.new_state, &state);
        prop_assert_eq!(result.effects, vec![Effect::reply(content::invalid_answer(index))]);
    }

    // Invariant 5: Cancel always reaches idle
    #[test]
    fn prop_cancel_clears_session(state in arb_state()) {
        let result = transition(&state, Event::Cancel);
        prop_assert_eq!(&result.new_state, &ConvState::Idle);
        prop_assert!(result.new_state.collected_answers().is_empty());
        prop_assert_eq!(result.effects, vec![Effect::reply(content::CANCELLED)]);
    }

    // Invariant 6: Non-menu text while idle gets guidance and changes nothing
    #[test]
    fn prop_idle_non_menu_text(text in "[a-zA-Z0-9 ]{0,40}") {
        prop_assume!(MenuOption::from_label(&text).is_none());
        let result = transition(&ConvState::Idle, Event::Text { text });
        prop_assert_eq!(&result.new_state, &ConvState::Idle);
        prop_assert_eq!(result.effects, vec![Effect::reply(content::USE_MENU)]);
    }

    // Invariant 7: Any report text is recorded, and the rendered echo reads
    // back as exactly that text
    #[test]
    fn prop_report_echoes_text(text in arb_report_text()) {
        let result = transition(&ConvState::AwaitingReport, Event::Text { text: text.clone() });
        prop_assert_eq!(&result.new_state, &ConvState::Idle);
        prop_assert_eq!(&result.effects[0], &Effect::RecordReport { text: text.clone() });

        let replies: Vec<&str> = result.effects.iter().filter_map(Effect::reply_text).collect();
        prop_assert!(replies.iter().all(|r| r.chars().count() <= content::MAX_MESSAGE_CHARS));
        prop_assert_eq!(content::unescape_markdown(&rendered_echo(&replies)), text);
    }

    // Invariant 8: Unknown commands never change state or reply
    #[test]
    fn prop_unknown_command_is_noop(state in arb_state(), command in "[a-z]{1,10}") {
        let result = transition(&state, Event::UnknownCommand { command });
        prop_assert_eq!(&result.new_state, &state);
        prop_assert!(result.effects.is_empty());
    }

    // Invariant 9: The cancel button parses as cancel and never as an answer
    #[test]
    fn prop_cancel_button_cancels(state in arb_state()) {
        let event = Event::from_text(LABEL_CANCEL, None);
        prop_assert_eq!(event.clone(), Some(Event::Cancel));
        if let Some(event) = event {
            prop_assert!(transition(&state, event).new_state.is_idle());
        }
    }
}
