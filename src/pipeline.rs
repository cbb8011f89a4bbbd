use crate::{
    answer_key::AnswerKeys,
    ci::CiContext,
    config::Config,
    discovery::ModuleFile,
    quiz::parse_quiz,
    report::{ModuleIssue, ModuleReport, RunReport},
    util::{now_rfc3339, sha256_hex},
    validate::{ValidationResult, validate},
};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, error, info, warn};

pub struct QuizRun {
    cfg: Config,
    keys: AnswerKeys,
}

/// Loads the answer keys, or an empty set carrying the load error when the
/// file is missing or broken.
pub fn load_keys_or_empty(cfg: &Config, path: &Path) -> AnswerKeys {
    match AnswerKeys::load(path, cfg.answer_key.key_by) {
        Ok(keys) => {
            debug!("loaded answer keys for {} module(s)", keys.len());
            keys
        }
        Err(err) => {
            error!("error loading answer keys: {:#}", err);
            AnswerKeys::unavailable(format!("{err:#}"))
        }
    }
}

impl QuizRun {
    pub fn new(cfg: &Config, keys: AnswerKeys) -> Self {
        Self {
            cfg: cfg.clone(),
            keys,
        }
    }

    pub fn run(&self, files: &[ModuleFile], ci: CiContext) -> RunReport {
        let started = now_rfc3339();
        if files.is_empty() {
            warn!("no quiz files to check");
        }

        let modules = files.iter().map(|f| self.process(f)).collect();

        RunReport {
            started,
            finished: now_rfc3339(),
            ci,
            key_problems: self.keys.problems().to_vec(),
            modules,
        }
    }

    fn process(&self, file: &ModuleFile) -> ModuleReport {
        let key = self.keys.get(&file.module);
        let mut issues = Vec::new();
        if key.is_none() {
            warn!("no answer key for module {}", file.module);
            issues.push(ModuleIssue::NoAnswerKey);
        }

        let mut report = ModuleReport {
            module: file.module.clone(),
            path: file.path.display().to_string(),
            content_sha256: None,
            question_count: 0,
            result: ValidationResult::default(),
            issues: Vec::new(),
        };

        match read_quiz(&file.path) {
            Ok(content) => {
                let questions = parse_quiz(&content);
                report.content_sha256 = Some(sha256_hex(content.as_bytes()));
                report.question_count = questions.len();
                if let Some(key) = key {
                    report.result = validate(&questions, key, self.cfg.answer_key.key_by);
                }
                let r = &report.result;
                info!(
                    "processed {}: {} correct, {} wrong, {} missing",
                    file.module, r.correct, r.wrong, r.missing
                );
            }
            Err(err) => {
                error!("error processing {}: {:#}", file.module, err);
                issues.push(ModuleIssue::Unreadable {
                    error: format!("{err:#}"),
                });
                report.result = ValidationResult::degraded(key);
            }
        }

        report.issues = issues;
        report
    }
}

fn read_quiz(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading quiz: {}", path.display()))
}
