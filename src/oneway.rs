// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::Tags;

/// Which traversal orientations an [Arc](crate::Arc) permits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Directionality {
    /// Traversable in both orientations.
    #[default]
    Bidirectional,

    /// Traversable start→end only.
    ForwardOnly,

    /// Traversable end→start only.
    ReverseOnly,
}

impl Directionality {
    /// Whether the arc may be traversed from its start towards its end.
    pub fn allows_start_to_end(self) -> bool {
        self != Self::ReverseOnly
    }

    /// Whether the arc may be traversed from its end towards its start.
    pub fn allows_end_to_start(self) -> bool {
        self != Self::ForwardOnly
    }
}

/// Derives an arc's [Directionality] from its tags.
///
/// Rules are applied in a fixed order (`oneway`, then `junction`, then
/// `highway`); once a rule has restricted the arc, later rules never
/// override the restriction. Unrecognized values leave the arc untouched.
pub(crate) fn classify(tags: &Tags) -> Directionality {
    let mut direction = Directionality::Bidirectional;

    match tags.get("oneway").map(|v| v.as_str()) {
        Some("yes") => direction = Directionality::ForwardOnly,
        Some("-1") => direction = Directionality::ReverseOnly,
        _ => {}
    }

    // Roundabout traffic flows in arc-recording order.
    if direction == Directionality::Bidirectional && tags.get("junction").map(|v| v.as_str()) == Some("roundabout") {
        direction = Directionality::ForwardOnly;
    }

    if direction == Directionality::Bidirectional && tags.get("highway").map(|v| v.as_str()) == Some("motorway") {
        direction = Directionality::ForwardOnly;
    }

    direction
}
