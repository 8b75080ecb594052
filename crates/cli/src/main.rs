use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hullmerge::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod field;
mod provenance;

use field::{MergeReport, Playfield};
use provenance::{write_sidecar, Run};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Convex-region merge and point-location experiments")]
struct Cmd {
    /// Partition tree variant used for bridge validation
    #[arg(long, value_enum, default_value_t = Kind::Axis)]
    kind: Kind,

    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Axis,
    Conjugate,
}

impl From<Kind> for PartitionKind {
    fn from(k: Kind) -> Self {
        match k {
            Kind::Axis => PartitionKind::AxisSplit,
            Kind::Conjugate => PartitionKind::Conjugate,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Write a random playfield of disjoint convex regions
    Generate {
        #[arg(long, default_value_t = 4)]
        cols: usize,
        #[arg(long, default_value_t = 4)]
        rows: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        #[arg(long, default_value_t = 600.0)]
        height: f64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Validate merging two regions of a playfield and write the result
    Merge {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        first: usize,
        #[arg(long)]
        second: usize,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print which region of a playfield contains a point
    Locate {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let kind = PartitionKind::from(cmd.kind);
    match cmd.action {
        Action::Generate {
            cols,
            rows,
            seed,
            width,
            height,
            out,
        } => generate(cols, rows, seed, Rect::new(0.0, 0.0, width, height), &out),
        Action::Merge {
            input,
            first,
            second,
            out,
        } => merge_cmd(&input, first, second, kind, &out),
        Action::Locate { input, x, y } => locate(&input, x, y, kind),
        Action::Report => report(),
    }
}

fn write_json<T: serde::Serialize>(out: &Path, value: &T) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    std::fs::write(out, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", out.display()))
}

fn generate(cols: usize, rows: usize, seed: u64, bounds: Rect, out: &Path) -> Result<()> {
    tracing::info!(cols, rows, seed, out = %out.display(), "generate");
    let field = Playfield::generate(bounds, cols, rows, seed);
    write_json(out, &field)?;
    let params = serde_json::json!({ "cols": cols, "rows": rows, "bounds": field.bounds });
    write_sidecar(out, Run::generate(params, seed))?;
    Ok(())
}

fn merge_cmd(input: &Path, first: usize, second: usize, kind: PartitionKind, out: &Path) -> Result<()> {
    tracing::info!(input = %input.display(), first, second, ?kind, "merge");
    let field = Playfield::read(input)?;
    let report = MergeReport::plan(&field, first, second, kind)?;
    tracing::info!(
        crosses = report.crosses,
        absorbed = report.absorbed.len(),
        vertices = report.merged.len(),
        "merge_planned"
    );
    write_json(out, &report)?;
    let params = serde_json::json!({
        "first": first,
        "second": second,
        "kind": format!("{kind:?}"),
    });
    write_sidecar(out, Run::merge(params, input))?;
    Ok(())
}

fn locate(input: &Path, x: f64, y: f64, kind: PartitionKind) -> Result<()> {
    let field = Playfield::read(input)?;
    let set = field.region_set(kind, 0)?;
    let hit = set.locate(x, y).map(|(_, k)| *k);
    tracing::info!(x, y, region = ?hit, "locate");
    println!("{}", serde_json::json!({ "x": x, "y": y, "region": hit }));
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::source_revision(),
        "engine_version": hullmerge::VERSION,
        "eps": EPS,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
