use std::fmt::Write;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::routing::{edge_weight, RouteAlgorithm, RoutePlan};

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteRenderMode {
    /// Header plus one line per leg.
    #[default]
    PlainText,
    /// Single line with the joined path.
    Compact,
}

/// One edge travelled along a planned route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteLeg {
    pub index: usize,
    pub from: String,
    pub to: String,
    pub cost: f64,
    pub cumulative: f64,
    /// Whether the drone recharges at `from` before this leg.
    pub recharge_before: bool,
}

/// Structured representation of a planned route that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub algorithm: RouteAlgorithm,
    pub origin: String,
    pub destination: String,
    pub hops: usize,
    pub total_cost: f64,
    pub legs: Vec<RouteLeg>,
    pub recharge_stops: Vec<String>,
    pub segments: Vec<Vec<String>>,
}

impl RouteSummary {
    /// Convert a [`RoutePlan`] into a summary with per-leg costs resolved
    /// against `graph`.
    pub fn from_plan(plan: &RoutePlan, graph: &Graph) -> Result<Self> {
        let (Some(origin), Some(destination)) = (plan.origin(), plan.destination()) else {
            return Err(Error::EmptyRoute);
        };

        let index = graph.label_index();
        // Leg offsets at which each segment after the first begins.
        let mut recharge_points = Vec::with_capacity(plan.segments.len());
        let mut offset = 0usize;
        for segment in plan.segments.iter().take(plan.segments.len().saturating_sub(1)) {
            offset += segment.len().saturating_sub(1);
            recharge_points.push(offset);
        }

        let mut legs = Vec::with_capacity(plan.hop_count());
        let mut cumulative = 0.0;
        for (i, pair) in plan.path.windows(2).enumerate() {
            let cost = edge_weight(graph, &index, &pair[0], &pair[1])?;
            cumulative += cost;
            legs.push(RouteLeg {
                index: i + 1,
                from: pair[0].clone(),
                to: pair[1].clone(),
                cost,
                cumulative,
                recharge_before: recharge_points.contains(&i),
            });
        }

        Ok(Self {
            algorithm: plan.algorithm,
            origin: origin.to_string(),
            destination: destination.to_string(),
            hops: plan.hop_count(),
            total_cost: plan.total_cost,
            legs,
            recharge_stops: plan.recharge_stops.clone(),
            segments: plan.segments.clone(),
        })
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::Compact => self.render_compact(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route: {} -> {} ({} hops, cost {}, algorithm: {})",
            self.origin, self.destination, self.hops, self.total_cost, self.algorithm
        );

        if self.legs.is_empty() {
            let _ = writeln!(buffer, "  already at destination");
        }
        for leg in &self.legs {
            let marker = if leg.recharge_before { " [recharge]" } else { "" };
            let _ = writeln!(
                buffer,
                "{:>3}: {} -> {} (cost {}, total {}){marker}",
                leg.index, leg.from, leg.to, leg.cost, leg.cumulative
            );
        }

        if self.recharge_stops.is_empty() {
            let _ = writeln!(buffer, "Recharge stops: none");
        } else {
            let _ = writeln!(buffer, "Recharge stops: {}", self.recharge_stops.join(", "));
        }
        buffer
    }

    fn render_compact(&self) -> String {
        let path = std::iter::once(self.origin.as_str())
            .chain(self.legs.iter().map(|leg| leg.to.as_str()))
            .collect::<Vec<_>>()
            .join(" -> ");
        format!("{path} (cost {})", self.total_cost)
    }
}
