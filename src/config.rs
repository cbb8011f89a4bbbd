use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub global: Global,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub discovery: Discovery,
    #[serde(default)]
    pub answer_key: AnswerKeyCfg,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub ci: Ci,
    #[serde(default)]
    pub restock: Restock,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Global {
    /// Exit non-zero unless every module was graded and fully correct.
    pub strict: bool,
    pub print_summary: bool,
}
impl Default for Global {
    fn default() -> Self {
        Self {
            strict: false,
            print_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub theory_dir: String,
    pub answers_file: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            theory_dir: "exercises/theory".into(),
            answers_file: ".github/quiz_answers.json".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Discovery {
    pub file_pattern: String,
    pub require_checkboxes: bool,
}
impl Default for Discovery {
    fn default() -> Self {
        Self {
            file_pattern: "^module.*\\.md$".into(),
            require_checkboxes: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyBy {
    #[default]
    Text,
    Number,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerKeyCfg {
    pub key_by: KeyBy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Table,
    Comment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub report_path: String,
    pub format: ReportFormat,
    pub detailed: bool,
    pub mirror_stdout: bool,
    /// Empty disables the JSON report.
    pub json_path: String,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            report_path: "quiz_results.md".into(),
            format: ReportFormat::Table,
            detailed: true,
            mirror_stdout: true,
            json_path: "".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Ci {
    pub repository: Option<String>,
    pub pr_number: Option<u64>,
    pub run_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Restock {
    pub input: String,
    pub output: String,
    pub multiplier: f64,
}
impl Default for Restock {
    fn default() -> Self {
        Self {
            input: "input_data.json".into(),
            output: "output_data.json".into(),
            multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "quiz-check.log".into(),
        }
    }
}
