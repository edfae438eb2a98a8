// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Time-weighted routing over [OpenStreetMap](https://www.openstreetmap.org/)-style
//! road graphs, with turn-by-turn directions.
//!
//! A [Graph] is built from externally-ingested vertex and arc records
//! (see [io] for the expected data contract). During construction every arc
//! is annotated with its great-circle length, an estimated travel time
//! derived from road-classification tags, and a [Directionality]. Queries
//! then run Dijkstra's algorithm over the travel times ([quickest_route],
//! [quickest_route_via]), and a found [Route] can be rendered as
//! natural-language instructions ([synthesize_directions]).
//!
//! # Example
//!
//! ```
//! let mut b = turnwise::GraphBuilder::new();
//! b.add_vertex(1, 51.7520, -1.2577);
//! b.add_vertex(2, 51.7525, -1.2500);
//! b.add_vertex(3, 51.7530, -1.2420);
//! b.add_arc(10, 1, 2, [("name", "Broad Street")]);
//! b.add_arc(11, 2, 3, [("name", "Broad Street")]);
//! let g = b.build();
//!
//! let route = turnwise::quickest_route(&g, 1, 3).expect("no route");
//! let directions = turnwise::synthesize_directions(&g, &route).expect("bad topology");
//! print!("{}", directions);
//! ```

mod dijkstra;
mod directions;
mod distance;
mod error;
mod graph;
pub mod io;
mod oneway;
mod weight;

pub use dijkstra::{quickest_route, quickest_route_via, Route, RouteStep};
pub use directions::{
    synthesize_directions, Action, Compass, Directions, Instruction, RoadLabel, TurnSide,
};
pub use distance::{earth_distance, initial_bearing};
pub use error::Error;
pub use graph::{Graph, GraphBuilder};
pub use oneway::Directionality;

use std::collections::HashMap;

/// Free-form key-value tags attached to an [Arc], as produced by ingestion.
///
/// The routing core consumes the keys `maxspeed`, `highway`, `oneway`,
/// `junction`, `ref` and `name` (all case-sensitive); everything else is
/// carried along untouched.
pub type Tags = HashMap<String, String>;

/// Dense index of a [Vertex] within a [Graph].
pub type VertexIndex = usize;

/// Dense index of an [Arc] within a [Graph].
pub type ArcIndex = usize;

/// A point on the road network, with geographic coordinates in degrees.
///
/// Vertices are addressed by their dense [VertexIndex] within the [Graph];
/// the externally-assigned `id` is kept for lookups and reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    pub(crate) arcs: Vec<ArcIndex>,
}

impl Vertex {
    /// All arcs incident to this vertex, in no particular order.
    /// Every listed arc has this vertex as its start or its end.
    pub fn arcs(&self) -> &[ArcIndex] {
        &self.arcs
    }
}

/// A road segment between two vertices.
///
/// The length, travel time and directionality are derived exactly once,
/// while the owning [Graph] is built, and are immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub id: i64,
    pub(crate) start: VertexIndex,
    pub(crate) end: VertexIndex,
    pub tags: Tags,
    pub(crate) length: f64,
    pub(crate) travel_time: f64,
    pub(crate) direction: Directionality,
}

impl Arc {
    /// Index of the vertex this arc starts at.
    pub fn start(&self) -> VertexIndex {
        self.start
    }

    /// Index of the vertex this arc ends at.
    pub fn end(&self) -> VertexIndex {
        self.end
    }

    /// Great-circle length of the arc, in kilometers.
    pub fn length_km(&self) -> f64 {
        self.length
    }

    /// Estimated time to traverse the arc, in hours.
    pub fn travel_time_hours(&self) -> f64 {
        self.travel_time
    }

    /// Which traversal orientations this arc permits.
    pub fn direction(&self) -> Directionality {
        self.direction
    }

    /// Looks up a tag value by its (case-sensitive) key.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(|v| v.as_str())
    }

    /// True for arcs tagged `junction=roundabout`.
    pub fn is_roundabout(&self) -> bool {
        self.tag("junction") == Some("roundabout")
    }

    /// Given one endpoint of the arc, returns the other one.
    pub(crate) fn opposite(&self, v: VertexIndex) -> VertexIndex {
        if v == self.start {
            self.end
        } else {
            self.start
        }
    }
}
