use crate::{
    ci::CiContext,
    config::{Config, ReportFormat},
    discovery::{ModuleFile, discover},
    pipeline::{QuizRun, load_keys_or_empty},
    quiz::parse_quiz_file,
    report::{RunReport, render_comment, render_markdown, strict_failed},
    restock,
    util::{ensure_dir, write_file},
};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "quiz-check")]
#[command(about = "Grades checkbox markdown quizzes against an answer key")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./quiz-check.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Grade quiz files and write the report.
    Check {
        /// Quiz files to grade; skips discovery in the theory dir.
        #[arg(long = "file")]
        files: Vec<PathBuf>,
        #[arg(long)]
        answers: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,
        /// Also write the run as JSON.
        #[arg(long)]
        json: Option<PathBuf>,
        /// Only the summary table.
        #[arg(long)]
        summary_only: bool,
        /// Exit 1 when any answer is wrong or missing, or a module could not be graded.
        #[arg(long)]
        strict: bool,
    },
    /// Print the parsed questions of one file as JSON.
    Parse {
        #[arg(long)]
        file: PathBuf,
    },
    /// Flag inventory items that need restocking.
    Restock {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub fn dispatch(args: Args) -> Result<ExitCode> {
    let cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => match Config::load(&path) {
            Ok(cfg) => cfg,
            Err(err) => {
                // Still surface the failure through the normal log sink.
                let _guard = init_logging(&args, &Config::default())?;
                return Err(err);
            }
        },
        None => Config::default(),
    };
    let _guard = init_logging(&args, &cfg)?;

    match args.cmd {
        Command::Check {
            files,
            answers,
            out,
            format,
            json,
            summary_only,
            strict,
        } => {
            let opts = CheckOpts {
                files,
                answers,
                out,
                format: format.unwrap_or(cfg.output.format),
                json,
                detailed: cfg.output.detailed && !summary_only,
                strict: strict || cfg.global.strict,
            };
            check(&cfg, opts)
        }
        Command::Parse { file } => {
            let questions = parse_quiz_file(&file)?;
            println!("{}", serde_json::to_string_pretty(&questions)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Restock { input, output } => {
            run_restock(&cfg, input.as_deref(), output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    ["quiz-check.toml", "quiz-check.example.toml"]
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

fn init_logging(args: &Args, cfg: &Config) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the report; logs go to stderr.
    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if cfg.logging.write_to_file && !cfg.logging.file_path.is_empty() {
        let path = Path::new(&cfg.logging.file_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

struct CheckOpts {
    files: Vec<PathBuf>,
    answers: Option<PathBuf>,
    out: Option<PathBuf>,
    format: ReportFormat,
    json: Option<PathBuf>,
    detailed: bool,
    strict: bool,
}

fn check(cfg: &Config, opts: CheckOpts) -> Result<ExitCode> {
    let answers = opts
        .answers
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.answers_file));
    let keys = load_keys_or_empty(cfg, &answers);

    let files = if opts.files.is_empty() {
        discover(cfg)?
    } else {
        opts.files.iter().map(|p| ModuleFile::from_path(p)).collect()
    };

    let ci = CiContext::from_env(&cfg.ci);
    let run = QuizRun::new(cfg, keys).run(&files, ci);

    let rendered = match opts.format {
        ReportFormat::Table => render_markdown(&run, opts.detailed),
        ReportFormat::Comment => render_comment(&run),
    };

    let out = opts
        .out
        .unwrap_or_else(|| PathBuf::from(&cfg.output.report_path));
    write_file(&out, &rendered)?;
    if cfg.output.mirror_stdout {
        print!("{rendered}");
    }
    info!("results saved to {}", out.display());

    let json_path = opts.json.or_else(|| {
        (!cfg.output.json_path.is_empty()).then(|| PathBuf::from(&cfg.output.json_path))
    });
    if let Some(path) = json_path {
        write_file(&path, &serde_json::to_string_pretty(&run)?)?;
        info!("json report saved to {}", path.display());
    }

    if cfg.global.print_summary {
        log_summary(&run);
    }

    if strict_failed(&run, opts.strict) {
        let t = run.totals();
        warn!(
            "quiz validation failed: {} incorrect, {} missing, {} answer key problem(s)",
            t.wrong,
            t.missing,
            run.key_problems.len()
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn log_summary(run: &RunReport) {
    let t = run.totals();
    info!(
        "{} module(s): {} correct, {} wrong, {} missing of {}",
        run.modules.len(),
        t.correct,
        t.wrong,
        t.missing,
        t.total
    );
}

fn run_restock(cfg: &Config, input: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let input = input.map_or_else(|| PathBuf::from(&cfg.restock.input), Path::to_path_buf);
    let output = output.map_or_else(|| PathBuf::from(&cfg.restock.output), Path::to_path_buf);

    let items = restock::load_inventory(&input);
    let plan = restock::plan_restock(&items, cfg.restock.multiplier);
    restock::save_plan(&output, &plan)?;

    info!(
        "processed {} inventory items; {} need restocking; results saved to {}",
        items.len(),
        plan.iter().filter(|l| l.restock).count(),
        output.display()
    );
    Ok(())
}
