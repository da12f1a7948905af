use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Crate target prefixes of this workspace; only their events pass [`layer`].
pub const TARGET_PREFIXES: &[&str] = &[
    "rag_gateway",
    "rag_render",
    "interaction",
    "console",
    "rag_console",
];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

fn is_workspace_target(target: &str) -> bool {
    TARGET_PREFIXES.iter().any(|p| target.starts_with(p))
}

/// Build a formatting layer that renders ONLY events emitted by this workspace.
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format with `file:line`
/// - Span close events (duration of instrumented gateway calls)
/// - Written to **stderr**: stdout belongs to the display surface
/// - ANSI colors only when stderr is a terminal
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stderr().is_terminal();

    let only_workspace = filter::filter_fn(|meta| is_workspace_target(meta.target()));

    fmt::layer()
        .with_writer(io::stderr)
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(only_workspace)
}

/// Level directives for every workspace crate, e.g. `rag_gateway=debug`.
pub fn level_directives(level: Level) -> Vec<Directive> {
    let level = level.as_str().to_lowercase();
    TARGET_PREFIXES
        .iter()
        .filter_map(|prefix| Directive::from_str(&format!("{prefix}={level}")).ok())
        .collect()
}

/// Create an EnvFilter from `RUST_LOG` or the fallback `default`,
/// then raise/lower this workspace's crates to `level`.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    level_directives(level)
        .into_iter()
        .fold(base, |filter, directive| filter.add_directive(directive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_cover_every_crate() {
        let directives = level_directives(Level::DEBUG);
        assert_eq!(directives.len(), TARGET_PREFIXES.len());
        assert!(directives.iter().any(|d| d.to_string() == "rag_gateway=debug"));
    }

    #[test]
    fn target_filter_matches_submodules() {
        assert!(is_workspace_target("rag_gateway::services::backend_service"));
        assert!(is_workspace_target("interaction::controller"));
        assert!(!is_workspace_target("hyper::client"));
    }
}
