use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const PACKAGE_MARKER: &str = "__init__.py";

#[derive(Debug, Clone, PartialEq)]
pub enum PlanEntry {
    /// Directory that gets an `__init__.py`.
    Package(PathBuf),
    Module { path: PathBuf, contents: String },
}

/// Everything one run writes, in traversal order.
#[derive(Debug, Clone)]
pub struct Plan {
    pub base: PathBuf,
    pub entries: Vec<PlanEntry>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub packages: usize,
    pub modules: usize,
}

impl Plan {
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for entry in &self.entries {
            match entry {
                PlanEntry::Package(_) => summary.packages += 1,
                PlanEntry::Module { .. } => summary.modules += 1,
            }
        }
        summary
    }

    /// One line per path the plan would create, for `--dry-run`.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.entries.len() + 1);
        if self.base.exists() {
            lines.push(format!("replace {}", self.base.display()));
        }
        for entry in &self.entries {
            match entry {
                PlanEntry::Package(dir) => {
                    lines.push(format!("{}", dir.join(PACKAGE_MARKER).display()))
                }
                PlanEntry::Module { path, .. } => lines.push(format!("{}", path.display())),
            }
        }
        lines
    }
}

fn make_package(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create directory {}", dir.display()))?;
    let marker = dir.join(PACKAGE_MARKER);
    if !marker.exists() {
        fs::write(&marker, "").with_context(|| format!("write {}", marker.display()))?;
    }
    Ok(())
}

/// Deletes `plan.base` if present, then writes every entry. Nothing is
/// merged with a previous run.
pub fn write_plan(plan: &Plan) -> Result<Summary> {
    if plan.base.exists() {
        log::debug!("removing {}", plan.base.display());
        fs::remove_dir_all(&plan.base)
            .with_context(|| format!("remove {}", plan.base.display()))?;
    }

    for entry in &plan.entries {
        match entry {
            PlanEntry::Package(dir) => {
                log::debug!("package {}", dir.display());
                make_package(dir)?;
            }
            PlanEntry::Module { path, contents } => {
                log::debug!("module {}", path.display());
                fs::write(path, contents).with_context(|| format!("write {}", path.display()))?;
            }
        }
    }

    Ok(plan.summary())
}
