// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{hash_map::Entry, BinaryHeap, HashMap, HashSet};

use crate::{ArcIndex, Error, Graph, VertexIndex};
use log::{debug, trace};

#[derive(Debug, Clone, Copy)]
struct QueueItem {
    at: VertexIndex,
    travel_time: f64,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.travel_time == other.travel_time && self.at == other.at
    }
}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        // NOTE: We revert the order of comparison,
        // as lower travel times are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        // Equal travel times fall back to the lower vertex index,
        // which (by Graph construction) is the lower vertex id,
        // keeping searches reproducible.
        match other.travel_time.partial_cmp(&self.travel_time) {
            Some(std::cmp::Ordering::Equal) => Some(other.at.cmp(&self.at)),
            ord => ord,
        }
    }
}

impl Eq for QueueItem {}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.partial_cmp(other).unwrap()
    }
}

/// Per-vertex search state, kept in a per-query overlay map.
/// Vertices absent from the overlay are at infinite distance.
#[derive(Debug, Clone, Copy)]
struct SearchEntry {
    distance: f64,
    travel_time: f64,
    predecessor: Option<(VertexIndex, ArcIndex)>,
}

/// A single vertex along a found [Route].
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStep {
    /// External identifier of the vertex.
    pub vertex: i64,
    pub(crate) index: VertexIndex,
    /// The arc traversed to reach this vertex; `None` on the source step.
    pub(crate) arc: Option<ArcIndex>,
    /// Distance from the source, in kilometers.
    pub distance_km: f64,
    /// Travel time from the source, in hours.
    pub travel_time_hours: f64,
}

/// A found quickest path, from source to destination, with finalized
/// cumulative distances and travel times per vertex.
///
/// Created fresh per query and never shared between queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    steps: Vec<RouteStep>,
}

impl Route {
    /// The path, source first, destination last.
    pub fn steps(&self) -> &[RouteStep] {
        &self.steps
    }

    /// Sum of unweighted arc lengths along the path, in kilometers.
    pub fn total_distance_km(&self) -> f64 {
        self.steps.last().map(|s| s.distance_km).unwrap_or(0.0)
    }

    /// Sum of time-weighted arc lengths along the path, in hours.
    pub fn total_time_hours(&self) -> f64 {
        self.steps.last().map(|s| s.travel_time_hours).unwrap_or(0.0)
    }

    /// External identifiers of the path vertices, source first.
    pub fn vertex_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.steps.iter().map(|s| s.vertex)
    }
}

/// Finds the quickest (time-weighted) route between two vertices using
/// [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra's_algorithm).
///
/// Search state lives in a per-query overlay, so the base graph is never
/// mutated and repeated or concurrent queries against the same graph
/// cannot observe each other. For a fixed graph, repeated queries for the
/// same pair produce identical paths and totals.
///
/// Returns [Error::Unreachable] if no traversable path exists, and
/// [Error::UnknownVertex] if either endpoint id is not in the graph.
pub fn quickest_route(g: &Graph, source: i64, destination: i64) -> Result<Route, Error> {
    let source_idx = g.vertex_index(source).ok_or(Error::UnknownVertex(source))?;
    let destination_idx = g
        .vertex_index(destination)
        .ok_or(Error::UnknownVertex(destination))?;

    debug!("searching for quickest route {} -> {}", source, destination);

    let mut state: HashMap<VertexIndex, SearchEntry> = HashMap::new();
    let mut settled: HashSet<VertexIndex> = HashSet::new();
    let mut queue: BinaryHeap<QueueItem> = BinaryHeap::new();

    state.insert(
        source_idx,
        SearchEntry {
            distance: 0.0,
            travel_time: 0.0,
            predecessor: None,
        },
    );
    queue.push(QueueItem {
        at: source_idx,
        travel_time: 0.0,
    });

    while let Some(item) = queue.pop() {
        if item.at == destination_idx {
            return Ok(reconstruct(g, &state, destination_idx));
        }

        // The queue may hold multiple items per vertex; only the first
        // pop settles it, the rest are stale.
        if !settled.insert(item.at) {
            continue;
        }

        let Some(&working) = state.get(&item.at) else {
            continue;
        };
        trace!("settled vertex {}", g.vertex(item.at).id);

        for &arc_idx in g.vertex(item.at).arcs() {
            let arc = g.arc(arc_idx);

            // Orient the arc relative to the working vertex and discard
            // it if its directionality forbids that orientation.
            let neighbor = if arc.start() == item.at {
                if !arc.direction().allows_start_to_end() {
                    trace!("ignoring arc {}: reverse one way", arc.id);
                    continue;
                }
                arc.end()
            } else {
                if !arc.direction().allows_end_to_start() {
                    trace!("ignoring arc {}: one way", arc.id);
                    continue;
                }
                arc.start()
            };

            if settled.contains(&neighbor) {
                continue;
            }

            let candidate = SearchEntry {
                distance: working.distance + arc.length_km(),
                travel_time: working.travel_time + arc.travel_time_hours(),
                predecessor: Some((item.at, arc_idx)),
            };

            match state.entry(neighbor) {
                Entry::Vacant(e) => {
                    e.insert(candidate);
                    queue.push(QueueItem {
                        at: neighbor,
                        travel_time: candidate.travel_time,
                    });
                }
                Entry::Occupied(mut e) => {
                    if candidate.travel_time < e.get().travel_time {
                        e.insert(candidate);
                        queue.push(QueueItem {
                            at: neighbor,
                            travel_time: candidate.travel_time,
                        });
                    }
                }
            }
        }
    }

    Err(Error::Unreachable {
        from: source,
        to: destination,
    })
}

/// Finds the quickest route passing through an intermediate vertex,
/// as two sequential searches stitched into one [Route].
pub fn quickest_route_via(
    g: &Graph,
    source: i64,
    via: i64,
    destination: i64,
) -> Result<Route, Error> {
    let first = quickest_route(g, source, via)?;
    let second = quickest_route(g, via, destination)?;

    let mut steps = first.steps;
    let offset_km = steps.last().map(|s| s.distance_km).unwrap_or(0.0);
    let offset_hours = steps.last().map(|s| s.travel_time_hours).unwrap_or(0.0);

    // The via vertex ends the first leg and starts the second;
    // keep a single copy of it.
    steps.extend(second.steps.into_iter().skip(1).map(|mut s| {
        s.distance_km += offset_km;
        s.travel_time_hours += offset_hours;
        s
    }));

    Ok(Route { steps })
}

fn reconstruct(
    g: &Graph,
    state: &HashMap<VertexIndex, SearchEntry>,
    destination: VertexIndex,
) -> Route {
    let mut steps: Vec<RouteStep> = Vec::new();
    let mut at = destination;

    loop {
        let Some(entry) = state.get(&at) else { break };
        steps.push(RouteStep {
            vertex: g.vertex(at).id,
            index: at,
            arc: entry.predecessor.map(|(_, arc)| arc),
            distance_km: entry.distance,
            travel_time_hours: entry.travel_time,
        });
        match entry.predecessor {
            Some((prev, _)) => at = prev,
            None => break,
        }
    }

    steps.reverse();
    Route { steps }
}

#[cfg(test)]
mod tests {
    use super::{quickest_route, quickest_route_via};
    use crate::{Error, Graph, GraphBuilder};

    /// Builds the four-vertex diamond: 1-2, 1-3, 2-4, 3-4, with every
    /// arc's travel time forced to 1 hour except 1-3 at 5 hours.
    fn diamond() -> Graph {
        let mut b = GraphBuilder::new();
        b.add_vertex(1, 52.00, -1.00);
        b.add_vertex(2, 52.01, -1.01);
        b.add_vertex(3, 52.01, -0.99);
        b.add_vertex(4, 52.02, -1.00);
        b.add_arc(10, 1, 2, [("name", "north-west")]);
        b.add_arc(11, 1, 3, [("name", "north-east")]);
        b.add_arc(12, 2, 4, [("name", "north-west")]);
        b.add_arc(13, 3, 4, [("name", "north-east")]);
        let mut g = b.build();
        for arc in &mut g.arcs {
            arc.travel_time = if arc.id == 11 { 5.0 } else { 1.0 };
            arc.length = arc.travel_time;
        }
        g
    }

    #[test]
    fn prefers_the_cheaper_side_of_the_diamond() {
        let g = diamond();
        let route = quickest_route(&g, 1, 4).unwrap();
        assert_eq!(route.vertex_ids().collect::<Vec<_>>(), vec![1, 2, 4]);
        assert_eq!(route.total_time_hours(), 2.0);
        assert_eq!(route.total_distance_km(), 2.0);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let g = diamond();
        let a = quickest_route(&g, 1, 4).unwrap();
        let b = quickest_route(&g, 1, 4).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.total_distance_km(), b.total_distance_km());
        assert_eq!(a.total_time_hours(), b.total_time_hours());
    }

    #[test]
    fn oneway_restrictions_block_reverse_traversal() {
        let mut b = GraphBuilder::new();
        b.add_vertex(1, 52.00, -1.00);
        b.add_vertex(2, 52.01, -1.00);
        b.add_arc(10, 1, 2, [("oneway", "yes")]);
        let g = b.build();

        assert!(quickest_route(&g, 1, 2).is_ok());
        assert!(matches!(
            quickest_route(&g, 2, 1),
            Err(Error::Unreachable { from: 2, to: 1 }),
        ));
    }

    #[test]
    fn reverse_oneway_blocks_forward_traversal() {
        let mut b = GraphBuilder::new();
        b.add_vertex(1, 52.00, -1.00);
        b.add_vertex(2, 52.01, -1.00);
        b.add_arc(10, 1, 2, [("oneway", "-1")]);
        let g = b.build();

        assert!(quickest_route(&g, 2, 1).is_ok());
        assert!(quickest_route(&g, 1, 2).is_err());
    }

    #[test]
    fn disconnected_vertices_are_unreachable() {
        let mut b = GraphBuilder::new();
        b.add_vertex(1, 52.00, -1.00);
        b.add_vertex(2, 52.01, -1.00);
        b.add_vertex(3, 40.00, 5.00);
        b.add_arc(10, 1, 2, [("highway", "residential")]);
        let g = b.build();

        assert!(matches!(
            quickest_route(&g, 1, 3),
            Err(Error::Unreachable { from: 1, to: 3 }),
        ));
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let g = diamond();
        assert!(matches!(quickest_route(&g, 99, 4), Err(Error::UnknownVertex(99))));
        assert!(matches!(quickest_route(&g, 1, 99), Err(Error::UnknownVertex(99))));
    }

    #[test]
    fn equal_cost_ties_break_towards_lower_ids() {
        // 1 -> {2, 3} -> 4 with all travel times equal; the path through
        // vertex 2 must win, and keep winning.
        let mut b = GraphBuilder::new();
        b.add_vertex(1, 52.00, -1.00);
        b.add_vertex(2, 52.01, -1.01);
        b.add_vertex(3, 52.01, -0.99);
        b.add_vertex(4, 52.02, -1.00);
        b.add_arc(10, 1, 2, [("highway", "unclassified")]);
        b.add_arc(11, 1, 3, [("highway", "unclassified")]);
        b.add_arc(12, 2, 4, [("highway", "unclassified")]);
        b.add_arc(13, 3, 4, [("highway", "unclassified")]);
        let mut g = b.build();
        for arc in &mut g.arcs {
            arc.travel_time = 1.0;
            arc.length = 1.0;
        }

        for _ in 0..8 {
            let route = quickest_route(&g, 1, 4).unwrap();
            assert_eq!(route.vertex_ids().collect::<Vec<_>>(), vec![1, 2, 4]);
        }
    }

    #[test]
    fn via_routes_are_stitched_with_cumulative_totals() {
        let g = diamond();
        let route = quickest_route_via(&g, 1, 3, 4).unwrap();
        assert_eq!(route.vertex_ids().collect::<Vec<_>>(), vec![1, 3, 4]);
        assert_eq!(route.total_time_hours(), 6.0);

        // Cumulative values stay monotonic across the stitch point.
        let times: Vec<f64> = route.steps().iter().map(|s| s.travel_time_hours).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn route_to_self_is_empty_of_arcs() {
        let g = diamond();
        let route = quickest_route(&g, 1, 1).unwrap();
        assert_eq!(route.vertex_ids().collect::<Vec<_>>(), vec![1]);
        assert_eq!(route.total_distance_km(), 0.0);
    }

    #[test]
    fn builder_annotated_graphs_route_end_to_end() {
        // No travel-time overrides here: weights come from the
        // builder's own annotation passes.
        let mut b = GraphBuilder::new();
        b.add_vertex(1, 51.750, -1.260);
        b.add_vertex(2, 51.755, -1.255);
        b.add_vertex(3, 51.760, -1.250);
        b.add_arc(10, 1, 2, [("highway", "primary")]);
        b.add_arc(11, 2, 3, [("highway", "primary")]);
        let g = b.build();

        let route = quickest_route(&g, 1, 3).unwrap();
        assert_eq!(route.vertex_ids().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(route.total_distance_km() > 0.0);
        assert!(route.total_time_hours() > 0.0);
    }
}
