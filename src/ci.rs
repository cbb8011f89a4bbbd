use crate::config::Ci;
use serde::{Deserialize, Serialize};

/// Where a run happens. Only used to label reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiContext {
    pub repository: Option<String>,
    pub pr_number: Option<u64>,
    pub run_id: Option<String>,
}

impl CiContext {
    /// Config values win over the lookup (normally the process environment).
    pub fn resolve(cfg: &Ci, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        Self {
            repository: cfg.repository.clone().or_else(|| non_empty("GITHUB_REPOSITORY")),
            pr_number: cfg
                .pr_number
                .or_else(|| non_empty("PR_NUMBER").and_then(|v| v.trim().parse().ok())),
            run_id: cfg.run_id.clone().or_else(|| non_empty("GITHUB_RUN_ID")),
        }
    }

    pub fn from_env(cfg: &Ci) -> Self {
        Self::resolve(cfg, |k| std::env::var(k).ok())
    }

    pub fn is_empty(&self) -> bool {
        self.repository.is_none() && self.pr_number.is_none() && self.run_id.is_none()
    }

    pub fn label(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let mut parts = Vec::new();
        if let Some(repo) = &self.repository {
            parts.push(repo.clone());
        }
        if let Some(pr) = self.pr_number {
            parts.push(format!("PR #{pr}"));
        }
        if let Some(run) = &self.run_id {
            parts.push(format!("run {run}"));
        }
        Some(parts.join(" · "))
    }
}
