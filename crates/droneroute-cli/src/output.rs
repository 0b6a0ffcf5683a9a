//! Output formatting for CLI results.
//!
//! Every command builds a serialisable result struct; this module turns it
//! into the text the user asked for. Formatters return `String` so they can be
//! unit tested without capturing stdout.

use std::fmt::Write as _;
use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use droneroute_lib::{RouteRenderMode, RouteSuggestion, RouteSummary, SuggestionSource};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable multi-line text.
    #[default]
    Text,
    /// One line per result.
    Compact,
    /// Pretty-printed JSON.
    Json,
}

/// Write `value` to stdout as pretty JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if JSON serialization or writing fails.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::other)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

pub fn format_route(summary: &RouteSummary, format: OutputFormat) -> String {
    match format {
        OutputFormat::Compact => format!("{}\n", summary.render(RouteRenderMode::Compact)),
        _ => summary.render(RouteRenderMode::PlainText),
    }
}

/// A route and how often it was flown.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteFrequency {
    pub route: String,
    pub count: u64,
}

/// Visit count for one node.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NodeVisit {
    pub node: String,
    pub count: u64,
}

/// An order that could not be planned during replay.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkippedDelivery {
    pub from: String,
    pub to: String,
    pub reason: String,
}

/// Result of replaying a delivery history.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReplayReport {
    pub deliveries: u64,
    pub total_cost: f64,
    pub distinct_routes: usize,
    pub top_routes: Vec<RouteFrequency>,
    pub node_visits: Vec<NodeVisit>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedDelivery>,
}

pub fn format_replay(report: &ReplayReport, format: OutputFormat) -> String {
    let mut buffer = String::new();
    if format == OutputFormat::Compact {
        let _ = writeln!(
            buffer,
            "{} deliveries, cost {}, {} routes",
            report.deliveries, report.total_cost, report.distinct_routes
        );
        for entry in &report.top_routes {
            let _ = writeln!(buffer, "{} {}", entry.count, entry.route);
        }
        return buffer;
    }

    let _ = writeln!(
        buffer,
        "Replayed {} deliveries (total cost {}, {} distinct routes)",
        report.deliveries, report.total_cost, report.distinct_routes
    );
    write_skipped(&mut buffer, &report.skipped);

    let _ = writeln!(buffer, "\nMost frequent routes:");
    if report.top_routes.is_empty() {
        let _ = writeln!(buffer, "  (none)");
    }
    for (rank, entry) in report.top_routes.iter().enumerate() {
        let _ = writeln!(buffer, "{:>3}. {} ({})", rank + 1, entry.route, entry.count);
    }

    let _ = writeln!(buffer, "\nNode visits:");
    let width = report
        .node_visits
        .iter()
        .map(|visit| visit.node.len())
        .max()
        .unwrap_or(0);
    for visit in &report.node_visits {
        let _ = writeln!(buffer, "  {:<width$}  {}", visit.node, visit.count);
    }
    buffer
}

/// Result of the `suggest` command.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SuggestReport {
    pub suggestion: RouteSuggestion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<NodeVisit>>,
    pub report: Vec<String>,
    /// History orders that could not be replayed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedDelivery>,
}

fn write_skipped(buffer: &mut String, skipped: &[SkippedDelivery]) {
    for entry in skipped {
        let _ = writeln!(
            buffer,
            "Skipped {} -> {}: {}",
            entry.from, entry.to, entry.reason
        );
    }
}

fn describe_source(suggestion: &RouteSuggestion) -> String {
    match suggestion.source {
        SuggestionSource::Exact => match suggestion.frequency {
            Some(count) => format!("history, flown {count} times"),
            None => "history".to_string(),
        },
        SuggestionSource::Stitched => "stitched from history".to_string(),
        SuggestionSource::Computed => match &suggestion.plan {
            Some(plan) => format!("computed, cost {}", plan.total_cost),
            None => "computed".to_string(),
        },
        SuggestionSource::Unresolved => "unresolved".to_string(),
    }
}

pub fn format_suggestion(report: &SuggestReport, format: OutputFormat) -> String {
    let path = report.suggestion.path.join(" -> ");
    let source = describe_source(&report.suggestion);
    if format == OutputFormat::Compact {
        return format!("{path} ({source})\n");
    }

    let mut buffer = String::new();
    let _ = writeln!(buffer, "Suggested route: {path} ({source})");
    write_skipped(&mut buffer, &report.skipped);
    if let Some(patterns) = &report.patterns {
        let _ = writeln!(buffer, "\nNode pattern weights:");
        for visit in patterns {
            let _ = writeln!(buffer, "  {}: {}", visit.node, visit.count);
        }
    }
    let _ = writeln!(buffer, "\nOptimization report:");
    for line in &report.report {
        let _ = writeln!(buffer, "  - {line}");
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay() -> ReplayReport {
        ReplayReport {
            deliveries: 3,
            total_cost: 42.0,
            distinct_routes: 2,
            top_routes: vec![
                RouteFrequency {
                    route: "A→B".to_string(),
                    count: 2,
                },
                RouteFrequency {
                    route: "A→C".to_string(),
                    count: 1,
                },
            ],
            node_visits: vec![
                NodeVisit {
                    node: "A".to_string(),
                    count: 3,
                },
                NodeVisit {
                    node: "B".to_string(),
                    count: 2,
                },
            ],
            skipped: vec![SkippedDelivery {
                from: "A".to_string(),
                to: "Z".to_string(),
                reason: "no route".to_string(),
            }],
        }
    }

    #[test]
    fn replay_text_lists_ranked_routes() {
        let text = format_replay(&replay(), OutputFormat::Text);
        assert!(text.starts_with("Replayed 3 deliveries (total cost 42, 2 distinct routes)"));
        assert!(text.contains("  1. A→B (2)"));
        assert!(text.contains("  2. A→C (1)"));
        assert!(text.contains("Skipped A -> Z: no route"));
        assert!(text.contains("  A  3"));
    }

    #[test]
    fn replay_compact_is_terse() {
        let text = format_replay(&replay(), OutputFormat::Compact);
        assert_eq!(text, "3 deliveries, cost 42, 2 routes\n2 A→B\n1 A→C\n");
    }

    #[test]
    fn suggestion_mentions_its_source() {
        let report = SuggestReport {
            suggestion: RouteSuggestion {
                source: SuggestionSource::Exact,
                path: vec!["A".to_string(), "B".to_string()],
                frequency: Some(4),
                plan: None,
            },
            patterns: None,
            report: vec!["Using frequent exact route: A→B (seen 4 times)".to_string()],
            skipped: vec![SkippedDelivery {
                from: "A".to_string(),
                to: "Q".to_string(),
                reason: "vertex not found: Q".to_string(),
            }],
        };
        let text = format_suggestion(&report, OutputFormat::Text);
        assert!(text.starts_with("Suggested route: A -> B (history, flown 4 times)"));
        assert!(text.contains("  - Using frequent exact route"));
        assert!(text.contains("Skipped A -> Q: vertex not found: Q"));
        assert_eq!(
            format_suggestion(&report, OutputFormat::Compact),
            "A -> B (history, flown 4 times)\n"
        );
    }
}
