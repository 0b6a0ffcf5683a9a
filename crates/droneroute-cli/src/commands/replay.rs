//! Replay command handler: fly a delivery history through the tracker.

use anyhow::{Context, Result};
use tracing::warn;

use droneroute_lib::{load_orders, DeliveryOrder, DeliverySession};

use crate::output::{
    format_replay, print_json, NodeVisit, OutputFormat, ReplayReport, RouteFrequency,
    SkippedDelivery,
};
use crate::{GlobalOptions, ReplayArgs};

/// Plan and complete every order in turn.
///
/// Orders that cannot be planned are logged and returned instead of aborting
/// the replay.
pub fn replay_orders(
    session: &mut DeliverySession,
    orders: &[DeliveryOrder],
) -> Vec<SkippedDelivery> {
    let mut skipped = Vec::new();
    for order in orders {
        if let Err(err) = session.deliver(&order.from, &order.to) {
            warn!(from = %order.from, to = %order.to, error = %err, "skipping delivery");
            skipped.push(SkippedDelivery {
                from: order.from.clone(),
                to: order.to.clone(),
                reason: err.to_string(),
            });
        }
    }
    skipped
}

/// Handle the replay subcommand.
pub fn handle_replay_command(options: &GlobalOptions, args: &ReplayArgs) -> Result<()> {
    let config = options.engine_config()?;
    let network = options.load_network()?;
    let orders = load_orders(&args.deliveries).with_context(|| {
        format!("failed to read deliveries from {}", args.deliveries.display())
    })?;

    let mut session = DeliverySession::new(network, config)?;
    let skipped = replay_orders(&mut session, &orders);
    let top_routes = session
        .tracker()
        .get_most_frequent_routes(args.top)
        .into_iter()
        .map(|(route, count)| RouteFrequency { route, count })
        .collect();
    let summary = session.finish();

    let report = ReplayReport {
        deliveries: summary.deliveries,
        total_cost: summary.total_cost,
        distinct_routes: summary.distinct_routes,
        top_routes,
        node_visits: summary
            .node_visits
            .into_iter()
            .map(|(node, count)| NodeVisit { node, count })
            .collect(),
        skipped,
    };

    match options.format {
        OutputFormat::Json => print_json(&report)?,
        format => print!("{}", format_replay(&report, format)),
    }
    Ok(())
}
