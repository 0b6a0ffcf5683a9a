//! Suggest command handler: ask the optimizer for a route.

use anyhow::{Context, Result};

use droneroute_lib::{load_orders, DeliverySession};

use crate::commands::replay::replay_orders;
use crate::output::{format_suggestion, print_json, NodeVisit, OutputFormat, SuggestReport};
use crate::{GlobalOptions, SuggestArgs};

/// Handle the suggest subcommand.
///
/// Any `--deliveries` history is replayed first so that the optimizer can
/// reuse it; without history the suggestion comes from a live search.
pub fn handle_suggest_command(options: &GlobalOptions, args: &SuggestArgs) -> Result<()> {
    let config = options.engine_config()?;
    let network = options.load_network()?;
    let mut session = DeliverySession::new(network, config)?;

    let mut skipped = Vec::new();
    if let Some(path) = &args.deliveries {
        let orders = load_orders(path)
            .with_context(|| format!("failed to read deliveries from {}", path.display()))?;
        skipped = replay_orders(&mut session, &orders);
    }

    let patterns = args.patterns.then(|| {
        session
            .analyze_patterns()
            .into_iter()
            .map(|(node, count)| NodeVisit { node, count })
            .collect()
    });
    let suggestion = session.suggest_route(&args.from, &args.to)?;
    let report = SuggestReport {
        suggestion,
        patterns,
        report: session
            .optimization_report()
            .lines()
            .map(str::to_string)
            .collect(),
        skipped,
    };

    match options.format {
        OutputFormat::Json => print_json(&report)?,
        format => print!("{}", format_suggestion(&report, format)),
    }
    Ok(())
}
