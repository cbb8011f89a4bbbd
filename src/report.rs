use crate::{
    ci::CiContext,
    validate::{Detail, Outcome, ValidationResult},
};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

const QUESTION_CELL_MAX: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModuleIssue {
    Unreadable { error: String },
    NoAnswerKey,
}

impl fmt::Display for ModuleIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleIssue::Unreadable { error } => write!(f, "unreadable: {error}"),
            ModuleIssue::NoAnswerKey => f.write_str("no answer key"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleReport {
    pub module: String,
    pub path: String,
    pub content_sha256: Option<String>,
    pub question_count: usize,
    pub result: ValidationResult,
    pub issues: Vec<ModuleIssue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started: String,
    pub finished: String,
    pub ci: CiContext,
    /// Answer-key entries or files that were skipped; any of these fails a strict run.
    pub key_problems: Vec<String>,
    pub modules: Vec<ModuleReport>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub correct: usize,
    pub wrong: usize,
    pub missing: usize,
    pub total: usize,
}

impl RunReport {
    pub fn totals(&self) -> Totals {
        self.modules.iter().fold(Totals::default(), |mut t, m| {
            t.correct += m.result.correct;
            t.wrong += m.result.wrong;
            t.missing += m.result.missing;
            t.total += m.result.total;
            t
        })
    }

    /// Every module was graded against a usable key and got everything right.
    pub fn passed(&self) -> bool {
        !self.modules.is_empty()
            && self.key_problems.is_empty()
            && self
                .modules
                .iter()
                .all(|m| m.issues.is_empty() && m.result.is_complete())
    }
}

pub fn strict_failed(run: &RunReport, strict: bool) -> bool {
    strict && !run.passed()
}

fn key_problems_section(md: &mut String, run: &RunReport) {
    if run.key_problems.is_empty() {
        return;
    }
    md.push_str("\n## Answer Key Problems\n\n");
    for p in &run.key_problems {
        let _ = writeln!(md, "- {}", cell(p));
    }
}

fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

fn truncate(s: &str) -> String {
    if s.chars().count() > QUESTION_CELL_MAX {
        let head: String = s.chars().take(QUESTION_CELL_MAX - 3).collect();
        format!("{head}...")
    } else {
        s.to_string()
    }
}

fn status_label(o: &Outcome) -> &'static str {
    match o {
        Outcome::Correct => "✅ Correct",
        Outcome::Wrong { .. } => "❌ Wrong",
        Outcome::Missing => "❓ Missing",
    }
}

fn detail_row(d: &Detail) -> String {
    let selected = d
        .selected_answer
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or("None selected");
    let correct = d
        .correct_answer
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or("N/A");
    format!(
        "| {} | {} | {} | {} |\n",
        cell(&truncate(&d.question.to_string())),
        status_label(&d.outcome),
        cell(selected),
        cell(correct)
    )
}

pub fn render_markdown(run: &RunReport, detailed: bool) -> String {
    let mut md = String::from("# Quiz Results\n\n");
    if let Some(label) = run.ci.label() {
        let _ = writeln!(md, "_{}_\n", cell(&label));
    }
    md.push_str("## Summary\n\n");
    md.push_str("| Module | Correct | Wrong | Missing | Total |\n");
    md.push_str("|--------|---------|-------|---------|-------|\n");
    for m in &run.modules {
        let r = &m.result;
        let _ = writeln!(
            md,
            "| {} | {} | {} | {} | {} |",
            cell(&m.module),
            r.correct,
            r.wrong,
            r.missing,
            r.total
        );
    }

    key_problems_section(&mut md, run);

    if !detailed {
        return md;
    }

    md.push_str("\n## Detailed Results\n\n");
    for m in &run.modules {
        if m.result.details.is_empty() {
            continue;
        }
        let _ = writeln!(md, "### {}\n", cell(&m.module));
        md.push_str("| Question | Status | Your Answer | Correct Answer |\n");
        md.push_str("|----------|--------|------------|---------------|\n");
        for d in &m.result.details {
            md.push_str(&detail_row(d));
        }
        md.push('\n');
    }
    md
}

fn with_outcome(r: &ValidationResult, pick: fn(&Outcome) -> bool) -> Vec<&Detail> {
    r.details.iter().filter(|d| pick(&d.outcome)).collect()
}

fn bullet_section(md: &mut String, heading: &str, details: &[&Detail]) {
    if details.is_empty() {
        return;
    }
    let _ = writeln!(md, "{heading}");
    for d in details {
        let _ = writeln!(md, "- {}", d.question);
    }
    md.push('\n');
}

/// Pull-request comment flavour: score line plus bullet lists per outcome.
pub fn render_comment(run: &RunReport) -> String {
    let mut md = String::from("## Quiz Validation Results\n\n");
    if let Some(label) = run.ci.label() {
        let _ = writeln!(md, "_{}_\n", label);
    }

    for m in &run.modules {
        let r = &m.result;
        if run.modules.len() > 1 {
            let _ = writeln!(md, "### {}\n", cell(&m.module));
        }
        let _ = writeln!(md, "### Score: {}/{}\n", r.correct, r.total);

        bullet_section(
            &mut md,
            "✅ **Correct Answers**",
            &with_outcome(r, |o| matches!(o, Outcome::Correct)),
        );
        bullet_section(
            &mut md,
            "❌ **Incorrect Answers**",
            &with_outcome(r, |o| matches!(o, Outcome::Wrong { .. })),
        );
        bullet_section(
            &mut md,
            "⚠️ **Missing Answers**",
            &with_outcome(r, |o| matches!(o, Outcome::Missing)),
        );

        for issue in &m.issues {
            let _ = writeln!(md, "> {}: {}\n", cell(&m.module), issue);
        }
    }
    key_problems_section(&mut md, run);
    md
}
