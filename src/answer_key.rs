use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::warn;
use unicode_normalization::UnicodeNormalization;

use crate::config::KeyBy;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionRef {
    Number(u32),
    Text(String),
}

impl QuestionRef {
    pub fn from_key(raw: &str, key_by: KeyBy) -> Result<Self> {
        match key_by {
            KeyBy::Text => Ok(QuestionRef::Text(raw.to_string())),
            KeyBy::Number => raw
                .trim()
                .parse::<u32>()
                .map(QuestionRef::Number)
                .map_err(|_| anyhow!("answer key expects question numbers, got {raw:?}")),
        }
    }
}

impl fmt::Display for QuestionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionRef::Number(n) => write!(f, "Question {n}"),
            QuestionRef::Text(t) => f.write_str(t),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expected {
    Index(usize),
    Text(String),
}

impl Expected {
    fn from_value(v: &Value) -> Result<Self> {
        match v {
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Expected::Index)
                .ok_or_else(|| anyhow!("option index must be a non-negative integer: {n}")),
            Value::String(s) => Ok(Expected::Text(s.clone())),
            other => bail!("expected an option index or option text, got {other}"),
        }
    }

    /// Index of the expected option within `options`, if it resolves.
    pub fn resolve(&self, options: &[String]) -> Option<usize> {
        match self {
            Expected::Index(i) => (*i < options.len()).then_some(*i),
            Expected::Text(t) => {
                let want = normalize_text(t);
                options.iter().position(|o| normalize_text(o) == want)
            }
        }
    }
}

/// NFKC, lowercase, whitespace collapsed.
pub fn normalize_text(s: &str) -> String {
    let folded = s.nfkc().collect::<String>().to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKey {
    pub entries: Vec<(QuestionRef, Expected)>,
}

impl AnswerKey {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnswerKeys {
    modules: HashMap<String, AnswerKey>,
    /// Entries, modules or whole files that could not be used.
    problems: Vec<String>,
}

impl AnswerKeys {
    pub fn load(path: &Path, key_by: KeyBy) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading answer key: {}", path.display()))?;
        Self::from_json_str(&raw, key_by)
            .with_context(|| format!("parsing answer key: {}", path.display()))
    }

    /// Fails only when the document itself is unusable; bad modules and
    /// entries are skipped and listed in `problems()`.
    pub fn from_json_str(raw: &str, key_by: KeyBy) -> Result<Self> {
        let root: Value = serde_json::from_str(raw)?;
        let Value::Object(modules) = root else {
            bail!("answer key root must be an object of modules");
        };

        let mut keys = Self::default();
        for (module, questions) in modules {
            let Value::Object(questions) = questions else {
                keys.skip(format!("answer key for module {module:?} must be an object"));
                continue;
            };
            let mut entries = Vec::with_capacity(questions.len());
            for (id, expected) in &questions {
                let entry = QuestionRef::from_key(id, key_by).and_then(|qref| {
                    Expected::from_value(expected).map(|expected| (qref, expected))
                });
                match entry {
                    Ok(entry) => entries.push(entry),
                    Err(err) => keys.skip(format!("module {module:?}, question {id:?}: {err}")),
                }
            }
            keys.modules.insert(module, AnswerKey { entries });
        }
        Ok(keys)
    }

    /// Empty key set standing in for a file that could not be loaded.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            modules: HashMap::new(),
            problems: vec![reason.into()],
        }
    }

    fn skip(&mut self, problem: String) {
        warn!("skipping answer key entry: {problem}");
        self.problems.push(problem);
    }

    pub fn problems(&self) -> &[String] {
        &self.problems
    }

    pub fn get(&self, module: &str) -> Option<&AnswerKey> {
        self.modules.get(module)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
