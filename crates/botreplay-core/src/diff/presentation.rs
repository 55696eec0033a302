//! Presentation pass
//!
//! Builds question/answer rows for review. A row is anchored on a user
//! turn of the reference at index `i`; answers are read from index
//! `i + 1` of both sequences. Anchors holding a bot turn produce no
//! row at all.

use serde::{Deserialize, Serialize};

use crate::model::{Turn, TurnStatus};

/// One reviewed question with the reference and current answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub question: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_answer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_answer: Option<String>,

    /// Mismatched when the answers differ or either one is missing
    pub status: TurnStatus,
}

fn bot_text_at(turns: &[Turn], index: usize) -> Option<String> {
    turns
        .get(index)
        .and_then(|turn| turn.bot_text())
        .map(str::to_string)
}

/// Positional presentation of `replay` against `reference`
pub fn present(reference: &[Turn], replay: &[Turn]) -> Vec<ResultRow> {
    let min_len = reference.len().min(replay.len());
    let mut rows = Vec::new();

    for i in 0..min_len {
        let Some(question) = reference[i].user_text() else {
            continue;
        };

        let reference_answer = bot_text_at(reference, i + 1);
        let current_answer = bot_text_at(replay, i + 1);

        let status = match (&reference_answer, &current_answer) {
            (Some(expected), Some(actual)) if expected == actual => TurnStatus::Matched,
            _ => TurnStatus::Mismatched,
        };

        rows.push(ResultRow {
            question: question.to_string(),
            reference_answer,
            current_answer,
            status,
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialogue() -> Vec<Turn> {
        vec![
            Turn::user("hi"),
            Turn::bot("hello"),
            Turn::user("bye"),
            Turn::bot("goodbye"),
        ]
    }

    #[test]
    fn test_identical_dialogues() {
        let rows = present(&dialogue(), &dialogue());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].question, "hi");
        assert_eq!(rows[0].reference_answer.as_deref(), Some("hello"));
        assert_eq!(rows[0].current_answer.as_deref(), Some("hello"));
        assert!(rows.iter().all(|r| r.status == TurnStatus::Matched));
    }

    #[test]
    fn test_changed_answer() {
        let replay = vec![
            Turn::user("hi"),
            Turn::bot("hello"),
            Turn::user("bye"),
            Turn::bot("see you"),
        ];
        let rows = present(&dialogue(), &replay);

        assert_eq!(rows[1].question, "bye");
        assert_eq!(rows[1].current_answer.as_deref(), Some("see you"));
        assert_eq!(rows[1].status, TurnStatus::Mismatched);
    }

    #[test]
    fn test_missing_current_answer_is_a_divergence() {
        let replay = vec![Turn::user("hi"), Turn::bot("hello"), Turn::user("bye")];
        let rows = present(&dialogue(), &replay);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].reference_answer.as_deref(), Some("goodbye"));
        assert_eq!(rows[1].current_answer, None);
        assert_eq!(rows[1].status, TurnStatus::Mismatched);
    }

    #[test]
    fn test_leading_bot_turn_yields_no_row_at_that_anchor() {
        let reference = vec![Turn::bot("welcome!"), Turn::user("hi"), Turn::bot("hello")];
        let replay = vec![Turn::bot("bonjour !"), Turn::user("hey"), Turn::bot("salut")];
        let rows = present(&reference, &replay);

        // Index 0 is a bot turn: no row, even though its content differs.
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].question, "hi");
        assert_eq!(rows[0].status, TurnStatus::Mismatched);
    }

    #[test]
    fn test_reference_only_bot_turns_yield_nothing() {
        let reference = vec![Turn::bot("a"), Turn::bot("b")];
        let replay = vec![Turn::user("x"), Turn::bot("y")];
        assert!(present(&reference, &replay).is_empty());
    }

    #[test]
    fn test_rows_limited_to_shorter_sequence() {
        let replay = vec![Turn::user("hi")];
        let rows = present(&dialogue(), &replay);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].current_answer, None);
        assert_eq!(rows[0].status, TurnStatus::Mismatched);
    }
}
