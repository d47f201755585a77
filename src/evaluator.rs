// Quiz scoring. Must stay bit-for-bit compatible with the backend's grading:
// integer percentage with round-half-up, pass mark 70 inclusive.

use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Question, QuestionFeedback};

/// Minimum score (inclusive) to pass a quiz. Contractual constant shared with
/// the backend grader.
pub const PASS_THRESHOLD: u8 = 70;

#[derive(Error, Debug)]
pub enum EvalError {
    /// Submission reached the evaluator with unanswered questions. Supposed to
    /// be blocked upstream by the submit gate.
    #[error("submission is missing answers for {} question(s)", missing.len())]
    IncompleteSubmission { missing: Vec<Uuid> },
    /// Quiz module configured with zero questions. Content misconfiguration,
    /// not recoverable by the learner.
    #[error("quiz has no questions")]
    EmptyQuiz,
    /// A question carries no answer key, so local scoring cannot be simulated.
    #[error("question {0} has no answer key")]
    MissingAnswerKey(Uuid),
}

/// Submission gate: every question needs a selection before evaluation (or
/// server submission) may run. The UI blocks the submit action on this.
pub fn check_complete(
    questions: &[Question],
    selections: &HashMap<Uuid, usize>,
) -> Result<(), EvalError> {
    if questions.is_empty() {
        return Err(EvalError::EmptyQuiz);
    }
    let missing: Vec<Uuid> = questions
        .iter()
        .filter(|q| !selections.contains_key(&q.id))
        .map(|q| q.id)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(EvalError::IncompleteSubmission { missing })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    pub score: u8,
    pub passed: bool,
    pub correct_count: usize,
    pub total_questions: usize,
    pub feedback: Vec<QuestionFeedback>,
}

/// Scores a full set of selections against the questions' answer keys.
///
/// `selections` maps question id to the 0-based index of the chosen option.
/// Pure function: identical input always yields identical output.
pub fn evaluate(
    questions: &[Question],
    selections: &HashMap<Uuid, usize>,
) -> Result<QuizResult, EvalError> {
    check_complete(questions, selections)?;

    let mut correct_count = 0;
    let mut feedback = Vec::with_capacity(questions.len());
    for q in questions {
        let correct_option = q.correct_option.ok_or(EvalError::MissingAnswerKey(q.id))?;
        let chosen = selections[&q.id];
        let correct = chosen == correct_option;
        if correct {
            correct_count += 1;
        }
        feedback.push(QuestionFeedback {
            question_id: q.id,
            correct,
            chosen_option: chosen,
            correct_option,
        });
    }

    let total = questions.len();
    let score = percentage(correct_count, total);
    Ok(QuizResult {
        score,
        passed: score >= PASS_THRESHOLD,
        correct_count,
        total_questions: total,
        feedback,
    })
}

// round-half-up(100 * correct / total), in integer arithmetic so the result
// never drifts from the backend's.
fn percentage(correct: usize, total: usize) -> u8 {
    debug_assert!(total > 0 && correct <= total);
    ((200 * correct + total) / (2 * total)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct_option: usize) -> Question {
        Question {
            id: Uuid::new_v4(),
            prompt: "¿?".into(),
            options: vec!["a".into(), "b".into(), "c".into()],
            correct_option: Some(correct_option),
        }
    }

    fn answer_all(questions: &[Question], pick: impl Fn(usize) -> usize) -> HashMap<Uuid, usize> {
        questions
            .iter()
            .enumerate()
            .map(|(i, q)| (q.id, pick(i)))
            .collect()
    }

    #[test]
    fn seven_of_ten_passes_at_exactly_seventy() {
        let questions: Vec<_> = (0..10).map(|_| question(1)).collect();
        // first 7 correct, last 3 wrong
        let selections = answer_all(&questions, |i| if i < 7 { 1 } else { 0 });
        let r = evaluate(&questions, &selections).unwrap();
        assert_eq!(r.score, 70);
        assert!(r.passed);
        assert_eq!(r.correct_count, 7);
        assert_eq!(r.total_questions, 10);
    }

    #[test]
    fn six_of_ten_fails() {
        let questions: Vec<_> = (0..10).map(|_| question(1)).collect();
        let selections = answer_all(&questions, |i| if i < 6 { 1 } else { 0 });
        let r = evaluate(&questions, &selections).unwrap();
        assert_eq!(r.score, 60);
        assert!(!r.passed);
    }

    #[test]
    fn rounds_half_up() {
        // 1/8 = 12.5% -> 13
        let questions: Vec<_> = (0..8).map(|_| question(0)).collect();
        let selections = answer_all(&questions, |i| if i == 0 { 0 } else { 2 });
        let r = evaluate(&questions, &selections).unwrap();
        assert_eq!(r.score, 13);

        // 5/7 = 71.43% -> 71
        let questions: Vec<_> = (0..7).map(|_| question(0)).collect();
        let selections = answer_all(&questions, |i| if i < 5 { 0 } else { 2 });
        let r = evaluate(&questions, &selections).unwrap();
        assert_eq!(r.score, 71);
        assert!(r.passed);
    }

    #[test]
    fn perfect_and_zero_scores() {
        let questions: Vec<_> = (0..4).map(|_| question(2)).collect();
        let all_right = answer_all(&questions, |_| 2);
        assert_eq!(evaluate(&questions, &all_right).unwrap().score, 100);
        let all_wrong = answer_all(&questions, |_| 0);
        assert_eq!(evaluate(&questions, &all_wrong).unwrap().score, 0);
    }

    #[test]
    fn unanswered_questions_are_rejected() {
        let questions: Vec<_> = (0..3).map(|_| question(0)).collect();
        let mut selections = answer_all(&questions, |_| 0);
        selections.remove(&questions[1].id);
        match evaluate(&questions, &selections) {
            Err(EvalError::IncompleteSubmission { missing }) => {
                assert_eq!(missing, vec![questions[1].id]);
            }
            other => panic!("expected IncompleteSubmission, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn empty_quiz_is_an_error() {
        assert!(matches!(
            evaluate(&[], &HashMap::new()),
            Err(EvalError::EmptyQuiz)
        ));
    }

    #[test]
    fn missing_answer_key_is_an_error() {
        let mut q = question(0);
        q.correct_option = None;
        let id = q.id;
        let selections = HashMap::from([(id, 0)]);
        assert!(matches!(
            evaluate(&[q], &selections),
            Err(EvalError::MissingAnswerKey(got)) if got == id
        ));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let questions: Vec<_> = (0..5).map(|_| question(1)).collect();
        let selections = answer_all(&questions, |i| i % 3);
        let a = evaluate(&questions, &selections).unwrap();
        let b = evaluate(&questions, &selections).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn per_question_feedback_matches_selections() {
        let questions: Vec<_> = (0..2).map(|_| question(1)).collect();
        let selections = answer_all(&questions, |i| i); // q0 wrong, q1 right
        let r = evaluate(&questions, &selections).unwrap();
        assert_eq!(r.feedback.len(), 2);
        assert!(!r.feedback[0].correct);
        assert!(r.feedback[1].correct);
        assert_eq!(r.feedback[0].correct_option, 1);
    }
}
