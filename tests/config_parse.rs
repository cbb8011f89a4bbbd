use quiz_check::config::{Config, KeyBy, ReportFormat};

#[test]
fn parse_example_config() {
    let raw = include_str!("../quiz-check.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert!(!cfg.paths.theory_dir.is_empty());
    assert_eq!(cfg.answer_key.key_by, KeyBy::Text);
    assert_eq!(cfg.output.format, ReportFormat::Table);
    assert_eq!(cfg.restock.multiplier, 2.0);
}

#[test]
fn partial_sections_fall_back_to_defaults() {
    let raw = "[answer_key]\nkey_by = \"number\"\n\n[output]\nformat = \"comment\"\n";
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.answer_key.key_by, KeyBy::Number);
    assert_eq!(cfg.output.format, ReportFormat::Comment);
    assert_eq!(cfg.output.report_path, "quiz_results.md");
    assert_eq!(cfg.paths.answers_file, ".github/quiz_answers.json");
}
