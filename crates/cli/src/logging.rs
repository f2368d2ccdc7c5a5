//! Tracing setup for the CLI.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Crates whose events a plain `RQGEN_LOG` level applies to.
const WORKSPACE_CRATES: [&str; 3] = ["rqgen", "rqgen_cli", "rqgen_core"];

/// Install a stderr `fmt` subscriber.
///
/// `RQGEN_LOG` accepts a plain level ("trace", "debug", "info", "warn",
/// "error") applied to the workspace crates, or a full filter directive such
/// as "rqgen_core=debug,tera=warn". `verbose` forces debug.
pub fn init_tracing(verbose: bool) {
    let filter = filter_directive(std::env::var("RQGEN_LOG").ok().as_deref(), verbose);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already initialized");
    }
}

fn filter_directive(env: Option<&str>, verbose: bool) -> String {
    match env {
        _ if verbose => scoped("debug"),
        Some(level) if is_plain_level(level) => scoped(&level.to_ascii_lowercase()),
        Some(spec) if !spec.trim().is_empty() => spec.to_string(),
        _ => scoped("info"),
    }
}

fn scoped(level: &str) -> String {
    WORKSPACE_CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_info_for_workspace() {
        assert_eq!(
            filter_directive(None, false),
            "rqgen=info,rqgen_cli=info,rqgen_core=info"
        );
    }

    #[test]
    fn test_plain_level_is_scoped() {
        assert_eq!(
            filter_directive(Some("WARN"), false),
            "rqgen=warn,rqgen_cli=warn,rqgen_core=warn"
        );
    }

    #[test]
    fn test_full_directive_passes_through() {
        assert_eq!(
            filter_directive(Some("rqgen_core=trace,tera=warn"), false),
            "rqgen_core=trace,tera=warn"
        );
    }

    #[test]
    fn test_verbose_wins() {
        assert_eq!(
            filter_directive(Some("error"), true),
            "rqgen=debug,rqgen_cli=debug,rqgen_core=debug"
        );
    }
}
