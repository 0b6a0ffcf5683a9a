//! Route command handler for planning a single delivery.

use anyhow::{Context, Result};

use droneroute_lib::{RouteRequest, RouteSummary};

use crate::output::{format_route, print_json, OutputFormat};
use crate::{GlobalOptions, RouteArgs};

/// Handle the route subcommand.
///
/// Loads the network, plans `--from` to `--to` with the configured algorithm
/// and battery limit, then prints the route summary.
pub fn handle_route_command(options: &GlobalOptions, args: &RouteArgs) -> Result<()> {
    let config = options.engine_config()?;
    let network = options.load_network()?;

    let request = RouteRequest::recharge(&args.from, &args.to, config.battery_limit)
        .with_algorithm(config.algorithm);
    let plan = network.manager().plan_route(network.graph(), &request)?;
    let summary = RouteSummary::from_plan(&plan, network.graph())
        .context("failed to build route summary for display")?;

    match options.format {
        OutputFormat::Json => print_json(&summary)?,
        format => print!("{}", format_route(&summary, format)),
    }
    Ok(())
}
