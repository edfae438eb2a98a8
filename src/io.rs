// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! The data contract between external ingestion and the routing core.
//!
//! Whatever produces the road network (an OSM extract converter, a test
//! fixture generator, ...) hands over plain vertex and arc records:
//! unique identifiers, resolvable arc endpoints, and free-form tags.
//! This module defines those records and a JSON reader for them; parsing
//! of any source markup is out of scope here.

use crate::{Error, Graph, GraphBuilder, Tags};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A vertex record: stable identifier plus coordinates in degrees.
#[derive(Debug, Clone, Deserialize)]
pub struct VertexRecord {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

/// An arc record: stable identifier, endpoint vertex identifiers,
/// and road-classification tags.
#[derive(Debug, Clone, Deserialize)]
pub struct ArcRecord {
    pub id: i64,
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub tags: Tags,
}

/// A complete road network, as serialized by ingestion.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkFile {
    pub vertices: Vec<VertexRecord>,
    pub arcs: Vec<ArcRecord>,
}

impl NetworkFile {
    /// Assembles the records into an annotated [Graph].
    pub fn into_graph(self) -> Graph {
        let mut b = GraphBuilder::new();
        for v in self.vertices {
            b.add_vertex(v.id, v.lat, v.lon);
        }
        for a in self.arcs {
            b.add_arc(a.id, a.start, a.end, a.tags);
        }
        b.build()
    }
}

/// Reads a JSON [NetworkFile] and assembles it into a [Graph].
pub fn read_network<P: AsRef<Path>>(path: P) -> Result<Graph, Error> {
    let file = File::open(path)?;
    let network: NetworkFile = serde_json::from_reader(BufReader::new(file))?;
    Ok(network.into_graph())
}
