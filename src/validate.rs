use crate::answer_key::{AnswerKey, AnswerKeys, Expected, QuestionRef, normalize_text};
use crate::config::KeyBy;
use crate::quiz::Question;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Wrong { selected: usize, expected: Expected },
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detail {
    pub question: QuestionRef,
    pub outcome: Outcome,
    pub selected_index: Option<usize>,
    pub correct_index: Option<usize>,
    pub selected_answer: Option<String>,
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub correct: usize,
    pub wrong: usize,
    pub missing: usize,
    pub total: usize,
    pub details: Vec<Detail>,
}

impl ValidationResult {
    /// Result for a module whose file could not be processed.
    pub fn degraded(key: Option<&AnswerKey>) -> Self {
        let n = key.map_or(0, AnswerKey::len);
        Self {
            missing: n,
            total: n,
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.correct == self.total
    }

    fn record(&mut self, detail: Detail) {
        match detail.outcome {
            Outcome::Correct => self.correct += 1,
            Outcome::Wrong { .. } => self.wrong += 1,
            Outcome::Missing => self.missing += 1,
        }
        self.details.push(detail);
    }
}

fn find<'a>(questions: &'a [Question], id: &QuestionRef, key_by: KeyBy) -> Option<&'a Question> {
    // Duplicated identifiers resolve to the last occurrence.
    questions.iter().rev().find(|q| match (id, key_by) {
        (QuestionRef::Text(t), KeyBy::Text) => q.text == *t,
        (QuestionRef::Number(n), KeyBy::Number) => q.number == *n,
        _ => false,
    })
}

fn is_match(q: &Question, selected: usize, expected: &Expected) -> bool {
    match expected {
        Expected::Index(i) => selected == *i,
        Expected::Text(t) => q
            .options
            .get(selected)
            .is_some_and(|o| normalize_text(o) == normalize_text(t)),
    }
}

fn judge(questions: &[Question], id: &QuestionRef, expected: &Expected, key_by: KeyBy) -> Detail {
    let mut detail = Detail {
        question: id.clone(),
        outcome: Outcome::Missing,
        selected_index: None,
        correct_index: None,
        selected_answer: None,
        correct_answer: match expected {
            Expected::Text(t) => Some(t.clone()),
            Expected::Index(_) => None,
        },
    };

    let Some(q) = find(questions, id, key_by) else {
        return detail;
    };

    detail.correct_index = expected.resolve(&q.options);
    if let Some(i) = detail.correct_index {
        detail.correct_answer = Some(q.options[i].clone());
    }

    let Some(selected) = q.selected else {
        return detail;
    };
    detail.selected_index = Some(selected);
    detail.selected_answer = q.selected_text().map(str::to_string);
    detail.outcome = if is_match(q, selected, expected) {
        Outcome::Correct
    } else {
        Outcome::Wrong {
            selected,
            expected: expected.clone(),
        }
    };
    detail
}

pub fn validate(questions: &[Question], key: &AnswerKey, key_by: KeyBy) -> ValidationResult {
    let mut result = ValidationResult {
        total: key.len(),
        ..ValidationResult::default()
    };
    for (id, expected) in &key.entries {
        result.record(judge(questions, id, expected, key_by));
    }
    result
}

/// Zero-filled when the module has no key.
pub fn validate_module(
    module: &str,
    questions: &[Question],
    keys: &AnswerKeys,
    key_by: KeyBy,
) -> ValidationResult {
    match keys.get(module) {
        Some(key) => validate(questions, key, key_by),
        None => ValidationResult::default(),
    }
}
