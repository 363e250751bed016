use dioxus::prelude::Key;

use services::QuestionPhase;

use crate::vm::QuizIntent;

/// Map one key press onto the quiz action set.
///
/// Digits 1..=N select an option, Space confirms a multi-selection, Enter
/// advances after grading, and Escape toggles the abort prompt. While the
/// prompt is open every other key is swallowed.
pub(super) fn intent_for_key(
    key: &Key,
    phase: QuestionPhase,
    is_multi: bool,
    option_count: usize,
    abort_open: bool,
) -> Option<QuizIntent> {
    if abort_open {
        return (*key == Key::Escape).then_some(QuizIntent::DismissAbort);
    }
    if *key == Key::Escape {
        return Some(QuizIntent::RequestAbort);
    }

    match phase {
        QuestionPhase::Revealed => (*key == Key::Enter).then_some(QuizIntent::Advance),
        QuestionPhase::Answering => match key {
            Key::Character(value) if value == " " => {
                is_multi.then_some(QuizIntent::ConfirmSelection)
            }
            Key::Character(value) => value
                .parse::<usize>()
                .ok()
                .filter(|&n| n >= 1 && n <= option_count)
                .map(|n| QuizIntent::SelectOption(n - 1)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit(value: &str) -> Key {
        Key::Character(value.into())
    }

    #[test]
    fn digits_select_within_option_count() {
        let intent = intent_for_key(&digit("1"), QuestionPhase::Answering, false, 3, false);
        assert_eq!(intent, Some(QuizIntent::SelectOption(0)));
        let intent = intent_for_key(&digit("3"), QuestionPhase::Answering, false, 3, false);
        assert_eq!(intent, Some(QuizIntent::SelectOption(2)));
    }

    #[test]
    fn digits_beyond_option_count_do_nothing() {
        assert_eq!(
            intent_for_key(&digit("4"), QuestionPhase::Answering, false, 3, false),
            None
        );
        assert_eq!(
            intent_for_key(&digit("0"), QuestionPhase::Answering, false, 3, false),
            None
        );
    }

    #[test]
    fn digits_are_ignored_after_grading() {
        assert_eq!(
            intent_for_key(&digit("1"), QuestionPhase::Revealed, false, 3, false),
            None
        );
    }

    #[test]
    fn space_confirms_only_multi_answer_questions() {
        assert_eq!(
            intent_for_key(&digit(" "), QuestionPhase::Answering, true, 3, false),
            Some(QuizIntent::ConfirmSelection)
        );
        assert_eq!(
            intent_for_key(&digit(" "), QuestionPhase::Answering, false, 3, false),
            None
        );
        assert_eq!(
            intent_for_key(&digit(" "), QuestionPhase::Revealed, true, 3, false),
            None
        );
    }

    #[test]
    fn enter_advances_only_after_grading() {
        assert_eq!(
            intent_for_key(&Key::Enter, QuestionPhase::Revealed, false, 3, false),
            Some(QuizIntent::Advance)
        );
        assert_eq!(
            intent_for_key(&Key::Enter, QuestionPhase::Answering, false, 3, false),
            None
        );
    }

    #[test]
    fn escape_opens_then_dismisses_the_abort_prompt() {
        assert_eq!(
            intent_for_key(&Key::Escape, QuestionPhase::Answering, false, 3, false),
            Some(QuizIntent::RequestAbort)
        );
        assert_eq!(
            intent_for_key(&Key::Escape, QuestionPhase::Answering, false, 3, true),
            Some(QuizIntent::DismissAbort)
        );
    }

    #[test]
    fn open_prompt_swallows_other_keys() {
        assert_eq!(
            intent_for_key(&digit("1"), QuestionPhase::Answering, false, 3, true),
            None
        );
        assert_eq!(
            intent_for_key(&Key::Enter, QuestionPhase::Revealed, false, 3, true),
            None
        );
    }
}
