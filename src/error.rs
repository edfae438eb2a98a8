// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Error conditions surfaced by routing queries and direction synthesis.
///
/// Unreachability and malformed topology are expected outcomes on
/// real-world data and are deliberately distinct variants, so that callers
/// can branch on them instead of pattern-matching message strings.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The referenced vertex id is not present in the graph.
    #[error("unknown vertex: {0}")]
    UnknownVertex(i64),

    /// No traversable path exists from the source to the destination.
    #[error("no route from {from} to {to}")]
    Unreachable { from: i64, to: i64 },

    /// A roundabout walk returned to its entry vertex without ever
    /// reaching the expected exit, or the ring is not closed. Indicates
    /// malformed input data rather than a legitimately absent route.
    #[error("malformed roundabout at vertex {0}")]
    MalformedRoundabout(i64),

    /// Three consecutive path vertices produced a bearing difference of
    /// exactly 0 or ±π, for which no turn side is defined.
    #[error("undefined turn at vertex {0}")]
    UndefinedTurn(i64),

    /// The network file could not be read.
    #[error("failed to read network file")]
    Io(#[from] std::io::Error),

    /// The network file could not be decoded.
    #[error("failed to decode network file")]
    Json(#[from] serde_json::Error),
}
