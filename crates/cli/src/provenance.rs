//! Sidecar records for CLI outputs.
//!
//! `generate` writes a playfield and `merge` writes a merge report. Each one
//! gets a `<stem>.provenance.json` next to it: a playfield can be regenerated
//! from the recorded seed, and a report names the playfield it was planned on.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Subcommand that produced an artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Generate,
    Merge,
}

impl Step {
    fn name(self) -> &'static str {
        match self {
            Step::Generate => "generate",
            Step::Merge => "merge",
        }
    }
}

/// What gets recorded next to a playfield or merge report.
pub struct Run {
    pub step: Step,
    pub params: Value,
    /// Scatter seed of a generated playfield.
    pub seed: Option<u64>,
    /// Playfield a merge report was planned on.
    pub source: Option<PathBuf>,
}

impl Run {
    pub fn generate(params: Value, seed: u64) -> Self {
        Self {
            step: Step::Generate,
            params,
            seed: Some(seed),
            source: None,
        }
    }

    pub fn merge(params: Value, playfield: &Path) -> Self {
        Self {
            step: Step::Merge,
            params,
            seed: None,
            source: Some(playfield.to_path_buf()),
        }
    }
}

/// Write the sidecar for `artifact`, creating its directory when needed.
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, run: Run) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let path = sidecar_path(artifact);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let doc = json!({
        "command": run.step.name(),
        "engine_version": hullmerge::VERSION,
        "code_rev": source_revision(),
        "seed": run.seed,
        "source": run.source.as_ref().map(|p| p.to_string_lossy().into_owned()),
        "params": run.params,
        "output": artifact.to_string_lossy(),
    });
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(sidecar = %path.display(), command = run.step.name(), "provenance written");
    Ok(path)
}

/// `field.json` -> `field.provenance.json`.
fn sidecar_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    artifact.with_file_name(format!("{stem}.provenance.json"))
}

/// Commit of the build: `GIT_COMMIT` at compile or run time, else `git rev-parse`.
pub fn source_revision() -> String {
    let pinned = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty());
    if let Some(rev) = pinned {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_sits_next_to_the_report() {
        let derived = sidecar_path(Path::new("/tmp/output/merge.json"));
        assert_eq!(derived, Path::new("/tmp/output/merge.provenance.json"));
    }

    #[test]
    fn generated_playfield_records_its_seed() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("nested").join("field.json");
        let run = Run::generate(json!({"cols": 3}), 42);
        let path = write_sidecar(&artifact, run).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["output"], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["command"], "generate");
        assert_eq!(parsed["seed"], 42);
        assert!(parsed["source"].is_null());
        assert_eq!(parsed["engine_version"], hullmerge::VERSION);
    }

    #[test]
    fn merge_report_names_its_playfield() {
        let dir = tempdir().unwrap();
        let field = dir.path().join("field.json");
        let report = dir.path().join("merge.json");
        let run = Run::merge(json!({"first": 0, "second": 1}), &field);
        let path = write_sidecar(&report, run).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["command"], "merge");
        assert_eq!(parsed["source"], field.to_string_lossy().as_ref());
        assert!(parsed["seed"].is_null());
        assert_eq!(parsed["params"]["second"], 1);
    }
}
