// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{oneway, weight, Arc, ArcIndex, Tags, Vertex, VertexIndex};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};

/// Represents a road network as a set of [Vertices](Vertex)
/// connected by [Arcs](Arc).
///
/// Vertices and arcs are stored in dense arenas and addressed by
/// [VertexIndex]/[ArcIndex]; externally-assigned identifiers are resolved
/// through a lookup table built once at construction. A `Graph` is
/// immutable: all weight and directionality annotations are applied by
/// [GraphBuilder::build], and queries never mutate the base graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) arcs: Vec<Arc>,
    pub(crate) vertex_ids: HashMap<i64, VertexIndex>,
}

impl Graph {
    /// Returns the number of vertices in the graph.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of arcs in the graph.
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Retrieves a [Vertex] by its dense index.
    ///
    /// Panics if the index is out of bounds; indices obtained from this
    /// graph are always valid.
    pub fn vertex(&self, idx: VertexIndex) -> &Vertex {
        &self.vertices[idx]
    }

    /// Retrieves an [Arc] by its dense index.
    ///
    /// Panics if the index is out of bounds; indices obtained from this
    /// graph are always valid.
    pub fn arc(&self, idx: ArcIndex) -> &Arc {
        &self.arcs[idx]
    }

    /// Resolves an external vertex identifier to its dense index.
    pub fn vertex_index(&self, id: i64) -> Option<VertexIndex> {
        self.vertex_ids.get(&id).copied()
    }

    /// Retrieves a [Vertex] by its external identifier.
    pub fn vertex_by_id(&self, id: i64) -> Option<&Vertex> {
        self.vertex_index(id).map(|idx| &self.vertices[idx])
    }

    /// Returns an iterator over all [Vertices](Vertex), in ascending id order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// Returns an iterator over all [Arcs](Arc), in ascending id order.
    pub fn arcs(&self) -> impl Iterator<Item = &Arc> {
        self.arcs.iter()
    }
}

/// Accumulates vertex and arc records and assembles them into a [Graph].
///
/// Records may arrive in any order; arcs may reference vertices added
/// later. Resolution and validation happen in [GraphBuilder::build], which
/// also runs the weight and directionality passes, in that order, exactly
/// once. Duplicate identifiers are resolved last-record-wins.
#[derive(Debug, Default, Clone)]
pub struct GraphBuilder {
    vertices: BTreeMap<i64, (f64, f64)>,
    arcs: BTreeMap<i64, PendingArc>,
}

#[derive(Debug, Clone)]
struct PendingArc {
    start: i64,
    end: i64,
    tags: Tags,
}

impl GraphBuilder {
    /// Creates a new, empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex record with coordinates in degrees.
    pub fn add_vertex(&mut self, id: i64, lat: f64, lon: f64) {
        if self.vertices.insert(id, (lat, lon)).is_some() {
            debug!("duplicate vertex {}, keeping the later record", id);
        }
    }

    /// Adds an arc record between two vertex identifiers, with its tags.
    pub fn add_arc<K, V>(
        &mut self,
        id: i64,
        start: i64,
        end: i64,
        tags: impl IntoIterator<Item = (K, V)>,
    ) where
        K: Into<String>,
        V: Into<String>,
    {
        let tags = tags
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let pending = PendingArc { start, end, tags };
        if self.arcs.insert(id, pending).is_some() {
            debug!("duplicate arc {}, keeping the later record", id);
        }
    }

    /// Assembles the collected records into a [Graph].
    ///
    /// Arcs referencing vertices absent from the record set are dropped
    /// with a warning; the routing engine stays usable on imperfect data.
    /// Every surviving arc is then annotated with its length, travel time
    /// and directionality.
    pub fn build(self) -> Graph {
        // Vertices are laid out in ascending-id order, so dense index
        // order is id order. The search tie-breaks on indices and relies
        // on this to mean "lowest id wins".
        let mut vertices: Vec<Vertex> = self
            .vertices
            .into_iter()
            .map(|(id, (lat, lon))| Vertex {
                id,
                lat,
                lon,
                arcs: Vec::new(),
            })
            .collect();

        let vertex_ids: HashMap<i64, VertexIndex> = vertices
            .iter()
            .enumerate()
            .map(|(idx, v)| (v.id, idx))
            .collect();

        let mut arcs: Vec<Arc> = Vec::with_capacity(self.arcs.len());
        for (id, pending) in self.arcs {
            let (start, end) = match (
                vertex_ids.get(&pending.start),
                vertex_ids.get(&pending.end),
            ) {
                (Some(&start), Some(&end)) => (start, end),
                (None, _) => {
                    warn!("arc {} references unknown vertex {}, dropping it", id, pending.start);
                    continue;
                }
                (_, None) => {
                    warn!("arc {} references unknown vertex {}, dropping it", id, pending.end);
                    continue;
                }
            };

            let arc_idx = arcs.len();
            vertices[start].arcs.push(arc_idx);
            if end != start {
                vertices[end].arcs.push(arc_idx);
            }

            arcs.push(Arc {
                id,
                start,
                end,
                tags: pending.tags,
                length: 0.0,
                travel_time: 0.0,
                direction: oneway::Directionality::Bidirectional,
            });
        }

        weight::compute_weights(&vertices, &mut arcs);
        for arc in &mut arcs {
            arc.direction = oneway::classify(&arc.tags);
        }

        debug!(
            "built graph with {} vertices and {} arcs",
            vertices.len(),
            arcs.len()
        );

        Graph {
            vertices,
            arcs,
            vertex_ids,
        }
    }
}
