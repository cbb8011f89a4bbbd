use quiz_check::{
    ci::CiContext,
    config::Config,
    discovery::{ModuleFile, discover},
    pipeline::{QuizRun, load_keys_or_empty},
    report::{ModuleIssue, RunReport, strict_failed},
};
use std::path::{Path, PathBuf};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("quiz-check-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn config_for(dir: &Path) -> Config {
    let mut cfg = Config::default();
    cfg.paths.theory_dir = dir.join("theory").display().to_string();
    cfg.paths.answers_file = dir.join("answers.json").display().to_string();
    cfg
}

#[test]
fn discovers_grades_and_degrades() {
    let dir = scratch("pipeline");
    let theory = dir.join("theory");
    std::fs::create_dir_all(&theory).unwrap();
    std::fs::write(theory.join("module1.md"), "1. **Q1**\n- [x] A\n- [ ] B\n").unwrap();
    std::fs::write(theory.join("module2.md"), "1. **Q1**\n- [ ] A\n").unwrap();
    std::fs::write(theory.join("notes.md"), "1. **Q1**\n- [x] A\n").unwrap();
    std::fs::write(
        dir.join("answers.json"),
        r#"{"module1": {"Q1": 0}, "module3": {"Q1": 0, "Q2": 1}}"#,
    )
    .unwrap();

    let cfg = config_for(&dir);
    let mut files = discover(&cfg).unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.module.as_str()).collect();
    assert_eq!(names, vec!["module1", "module2"]);

    files.push(ModuleFile::from_path(&theory.join("module3.md")));

    let keys = load_keys_or_empty(&cfg, &PathBuf::from(&cfg.paths.answers_file));
    let run = QuizRun::new(&cfg, keys).run(&files, CiContext::default());

    let m1 = &run.modules[0];
    assert_eq!(m1.result.correct, 1);
    assert!(m1.issues.is_empty());
    assert_eq!(m1.content_sha256.as_ref().map(String::len), Some(64));

    let m2 = &run.modules[1];
    assert_eq!(m2.result.total, 0);
    assert_eq!(m2.issues, vec![ModuleIssue::NoAnswerKey]);

    let m3 = &run.modules[2];
    assert_eq!((m3.result.missing, m3.result.total), (2, 2));
    assert!(matches!(m3.issues[0], ModuleIssue::Unreadable { .. }));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn broken_answer_key_still_produces_results() {
    let dir = scratch("badkey");
    std::fs::write(dir.join("answers.json"), "[1, 2").unwrap();
    let quiz = dir.join("module1.md");
    std::fs::write(&quiz, "1. **Q1**\n- [x] A\n").unwrap();

    let cfg = config_for(&dir);
    let keys = load_keys_or_empty(&cfg, &PathBuf::from(&cfg.paths.answers_file));
    assert!(keys.is_empty());

    let run = QuizRun::new(&cfg, keys).run(&[ModuleFile::from_path(&quiz)], CiContext::default());
    assert_eq!(run.modules.len(), 1);
    assert_eq!(run.modules[0].question_count, 1);
    assert_eq!(run.modules[0].issues, vec![ModuleIssue::NoAnswerKey]);
    assert_eq!(run.key_problems.len(), 1);
    assert!(!run.passed());
    assert!(strict_failed(&run, true));
    assert!(!strict_failed(&run, false));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_theory_dir_is_empty() {
    let dir = scratch("nodir");
    let cfg = config_for(&dir);
    assert!(discover(&cfg).unwrap().is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn require_checkboxes_filters_content() {
    let dir = scratch("checkboxes");
    let theory = dir.join("theory");
    std::fs::create_dir_all(&theory).unwrap();
    std::fs::write(theory.join("module1.md"), "# Reading only\n").unwrap();
    std::fs::write(theory.join("module2.md"), "1. **Q**\n- [ ] A\n").unwrap();

    let mut cfg = config_for(&dir);
    cfg.discovery.require_checkboxes = true;
    let files = discover(&cfg).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].module, "module2");

    let _ = std::fs::remove_dir_all(&dir);
}

fn grade(name: &str, answers: &str, quiz: &str) -> RunReport {
    let dir = scratch(name);
    std::fs::write(dir.join("answers.json"), answers).unwrap();
    let path = dir.join("module1.md");
    std::fs::write(&path, quiz).unwrap();

    let cfg = config_for(&dir);
    let keys = load_keys_or_empty(&cfg, &PathBuf::from(&cfg.paths.answers_file));
    let run = QuizRun::new(&cfg, keys).run(&[ModuleFile::from_path(&path)], CiContext::default());
    let _ = std::fs::remove_dir_all(&dir);
    run
}

#[test]
fn strict_fails_on_wrong_answer() {
    let run = grade(
        "strict-wrong",
        r#"{"module1": {"Q1": 0}}"#,
        "1. **Q1**\n- [ ] A\n- [x] B\n",
    );
    assert_eq!(run.modules[0].result.wrong, 1);
    assert!(strict_failed(&run, true));
}

#[test]
fn strict_fails_on_malformed_key_entry() {
    let run = grade(
        "strict-badentry",
        r#"{"module1": {"Q1": 0, "Q2": -1}}"#,
        "1. **Q1**\n- [ ] A\n- [x] B\n",
    );
    let r = &run.modules[0].result;
    assert_eq!((r.correct, r.wrong, r.missing, r.total), (0, 1, 0, 1));
    assert_eq!(run.key_problems.len(), 1);
    assert!(strict_failed(&run, true));
}

#[test]
fn strict_passes_when_everything_is_correct() {
    let run = grade(
        "strict-ok",
        r#"{"module1": {"Q1": 1, "Q2": "yes"}}"#,
        "1. **Q1**\n- [ ] A\n- [x] B\n2. **Q2**\n- [x] Yes\n- [ ] No\n",
    );
    assert_eq!(run.modules[0].result.correct, 2);
    assert!(run.passed());
    assert!(!strict_failed(&run, true));
}

#[test]
fn malformed_module_key_leaves_other_modules_graded() {
    let dir = scratch("partialkey");
    std::fs::write(
        dir.join("answers.json"),
        r#"{"module1": {"Q1": 0}, "module2": {"Q1": null}}"#,
    )
    .unwrap();
    let m1 = dir.join("module1.md");
    let m2 = dir.join("module2.md");
    std::fs::write(&m1, "1. **Q1**\n- [ ] A\n- [x] B\n").unwrap();
    std::fs::write(&m2, "1. **Q1**\n- [x] A\n").unwrap();

    let cfg = config_for(&dir);
    let keys = load_keys_or_empty(&cfg, &PathBuf::from(&cfg.paths.answers_file));
    assert_eq!(keys.len(), 2);
    let files = [ModuleFile::from_path(&m1), ModuleFile::from_path(&m2)];
    let run = QuizRun::new(&cfg, keys).run(&files, CiContext::default());

    let r1 = &run.modules[0].result;
    assert_eq!((r1.correct, r1.wrong, r1.missing, r1.total), (0, 1, 0, 1));
    assert_eq!(run.modules[1].result.total, 0);
    assert_eq!(run.key_problems.len(), 1);
    assert!(run.key_problems[0].contains("module2"));

    let _ = std::fs::remove_dir_all(&dir);
}
