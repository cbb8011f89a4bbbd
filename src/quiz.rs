use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static QUESTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s+\*\*(.+)\*\*$").expect("question regex"));
static OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\s+\[([ xX])\]\s+(.+)$").expect("option regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The number written in the header line, not the position in the file.
    pub number: u32,
    pub text: String,
    pub options: Vec<String>,
    pub selected: Option<usize>,
}

impl Question {
    pub fn selected_text(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }
}

enum Line<'a> {
    Header { number: u32, text: &'a str },
    Option { checked: bool, text: &'a str },
    Other,
}

fn classify(line: &str) -> Line<'_> {
    let line = line.trim();
    if let Some(c) = QUESTION_RE.captures(line) {
        // Digits that overflow u32 are not a usable identifier; treat as noise.
        if let Ok(number) = c[1].parse::<u32>() {
            let text = c.get(2).map_or("", |m| m.as_str());
            return Line::Header { number, text };
        }
        return Line::Other;
    }
    if let Some(c) = OPTION_RE.captures(line) {
        let checked = c[1].eq_ignore_ascii_case("x");
        let text = c.get(2).map_or("", |m| m.as_str());
        return Line::Option { checked, text };
    }
    Line::Other
}

pub fn parse_quiz(content: &str) -> Vec<Question> {
    let mut questions = Vec::new();
    let mut current: Option<Question> = None;

    for line in content.lines() {
        match classify(line) {
            Line::Header { number, text } => {
                if let Some(q) = current.take() {
                    questions.push(q);
                }
                current = Some(Question {
                    number,
                    text: text.to_string(),
                    options: Vec::new(),
                    selected: None,
                });
            }
            Line::Option { checked, text } => {
                let Some(q) = current.as_mut() else {
                    continue;
                };
                q.options.push(text.to_string());
                if checked {
                    q.selected = Some(q.options.len() - 1);
                }
            }
            Line::Other => {}
        }
    }

    if let Some(q) = current {
        questions.push(q);
    }
    questions
}

pub fn parse_quiz_file(path: &Path) -> Result<Vec<Question>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading quiz: {}", path.display()))?;
    Ok(parse_quiz(&content))
}

/// True when the text contains at least one checkbox line.
pub fn has_checkboxes(content: &str) -> bool {
    content.lines().any(|l| OPTION_RE.is_match(l.trim()))
}
