use crate::{config::Config, quiz::has_checkboxes};
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleFile {
    pub module: String,
    pub path: PathBuf,
}

impl ModuleFile {
    pub fn from_path(path: &Path) -> Self {
        let module = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            module,
            path: path.to_path_buf(),
        }
    }
}

pub fn discover(cfg: &Config) -> Result<Vec<ModuleFile>> {
    let dir = Path::new(&cfg.paths.theory_dir);
    let pattern = Regex::new(&cfg.discovery.file_pattern)
        .with_context(|| format!("discovery.file_pattern: {}", cfg.discovery.file_pattern))?;

    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(err) => {
            warn!("theory dir unreadable ({}): {err}", dir.display());
            return Ok(Vec::new());
        }
    };

    let mut out = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !pattern.is_match(&name) {
            continue;
        }
        if cfg.discovery.require_checkboxes {
            match std::fs::read_to_string(&path) {
                Ok(content) if has_checkboxes(&content) => {}
                Ok(_) => {
                    debug!("skipping {}: no checkbox lines", path.display());
                    continue;
                }
                // Keep it; the pipeline records the read failure against the module.
                Err(_) => {}
            }
        }
        out.push(ModuleFile::from_path(&path));
    }

    out.sort_by(|a, b| a.path.cmp(&b.path));
    debug!("discovered {} module file(s) in {}", out.len(), dir.display());
    Ok(out)
}
