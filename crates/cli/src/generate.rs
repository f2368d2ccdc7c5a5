use std::path::PathBuf;

use clap::Args;
use similar::{ChangeTag, TextDiff};

use rqgen_core::{FileDrift, detect_drift, generate_react_query_functions, render_files};

use crate::config::{load_config, load_spec};
use crate::fs::LocalFs;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE", default_value = "rqgen.toml")]
    pub config: PathBuf,
    /// OpenAPI document (JSON, or YAML for .yaml/.yml)
    #[arg(long, value_name = "FILE")]
    pub spec: PathBuf,
    /// Directory the TypeScript files are written to
    #[arg(long = "out-dir", value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,
    /// Compare with the files on disk instead of writing; exit 1 on any difference
    #[arg(long)]
    pub check: bool,
}

pub async fn run(args: GenerateArgs) -> i32 {
    match run_inner(args).await {
        Ok(Outcome::Written(files)) => {
            for file in files {
                println!("wrote {file}");
            }
            0
        }
        Ok(Outcome::UpToDate) => {
            println!("up to date");
            0
        }
        Ok(Outcome::Drift(drift)) => {
            for file in &drift {
                print!("{}", render_diff(file));
            }
            eprintln!("{} generated file(s) out of date", drift.len());
            1
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

#[derive(Debug)]
enum Outcome {
    Written(Vec<String>),
    UpToDate,
    Drift(Vec<FileDrift>),
}

async fn run_inner(args: GenerateArgs) -> Result<Outcome, String> {
    let config = load_config(&args.config).await?;
    let spec = load_spec(&args.spec).await?;
    let fs = LocalFs::new(&args.out_dir);

    tracing::debug!(
        spec = %args.spec.display(),
        out_dir = %args.out_dir.display(),
        prefix = %config.filename_prefix,
        "Generating"
    );

    if args.check {
        let files = render_files(&spec, &config).map_err(|err| err.to_string())?;
        let drift = detect_drift(&fs, &files).await.map_err(|err| err.to_string())?;
        return Ok(if drift.is_empty() {
            Outcome::UpToDate
        } else {
            Outcome::Drift(drift)
        });
    }

    let written = generate_react_query_functions(&fs, &spec, &config)
        .await
        .map_err(|err| err.to_string())?;
    Ok(Outcome::Written(
        written
            .into_iter()
            .map(|file| args.out_dir.join(file.path).display().to_string())
            .collect(),
    ))
}

/// Unified diff of the on-disk file against the generated one.
fn render_diff(drift: &FileDrift) -> String {
    let current = drift.current.as_deref().unwrap_or("");
    let diff = TextDiff::from_lines(current, drift.expected.as_str());
    let mut output = String::new();

    let label = if drift.current.is_some() { "current" } else { "missing" };
    output.push_str(&format!("--- {} ({label})\n", drift.path));
    output.push_str(&format!("+++ {} (generated)\n", drift.path));

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push_str("...\n");
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                output.push_str(sign);
                output.push_str(change.value());
                if change.missing_newline() {
                    output.push('\n');
                }
            }
        }
    }

    output
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_diff_marks_changes() {
        let drift = FileDrift {
            path: "petstoreFunctions.ts".into(),
            current: Some("a\nb\nc\n".into()),
            expected: "a\nB\nc\n".into(),
        };
        let diff = render_diff(&drift);
        assert!(diff.starts_with("--- petstoreFunctions.ts (current)\n+++ petstoreFunctions.ts (generated)\n"));
        assert!(diff.contains("-b\n"));
        assert!(diff.contains("+B\n"));
        assert!(diff.contains(" a\n"));
    }

    #[test]
    fn test_render_diff_missing_file() {
        let drift = FileDrift {
            path: "petstoreUtils.ts".into(),
            current: None,
            expected: "x\n".into(),
        };
        let diff = render_diff(&drift);
        assert!(diff.contains("(missing)"));
        assert!(diff.contains("+x\n"));
    }
}
