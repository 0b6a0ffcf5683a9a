use thiserror::Error;

/// Convenient result alias for the drone routing library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a vertex label cannot be resolved against the current graph.
    #[error("vertex not found: {label}{}", format_suggestions(.suggestions))]
    VertexNotFound {
        label: String,
        suggestions: Vec<String>,
    },

    /// Raised when a vertex handle does not belong to (or no longer exists in) the graph.
    #[error("vertex handle {handle} is not owned by this graph")]
    ForeignVertex { handle: String },

    /// Raised when an edge weight is negative or not a finite number.
    #[error("edge weight must be finite and non-negative, got {weight}")]
    InvalidWeight { weight: f64 },

    /// Raised when consecutive nodes of a path are not connected by an edge.
    #[error("no edge from {from} to {to}")]
    MissingEdge { from: String, to: String },

    /// Raised when the search space is exhausted without reaching the destination.
    #[error(
        "no feasible route from {origin} to {destination} with battery limit {battery_limit}"
    )]
    NoFeasibleRoute {
        origin: String,
        destination: String,
        battery_limit: f64,
    },

    /// Raised when the battery ceiling is not a positive finite number.
    #[error("battery limit must be finite and positive, got {limit}")]
    InvalidBatteryLimit { limit: f64 },

    /// Raised when node-visit statistics are queried before the visit table exists.
    #[error("node visit table has not been materialized; call create_visit_table() first")]
    UninitializedVisitTable,

    /// Raised when an empty path is offered for registration.
    #[error("route must contain at least one node")]
    EmptyRoute,

    /// Raised when a topological order is requested for a graph containing a cycle.
    #[error("graph contains a cycle; topological sort is not possible")]
    CyclicGraph,

    /// Raised when a network document declares the same label twice.
    #[error("duplicate node label in network document: {label}")]
    DuplicateLabel { label: String },

    /// Raised when configuration values are missing or out of range.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
