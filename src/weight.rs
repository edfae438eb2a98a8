// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{earth_distance, Arc, Tags, Vertex};
use log::{trace, warn};

/// Kilometers in a statute mile, for converting mph speed values.
const KM_IN_MILE: f64 = 1.61;

/// Real-world average speeds sit below the nominal limit;
/// every estimated speed is damped by this factor.
const SPEED_DAMPENING: f64 = 0.75;

/// Assumed speed, in mph, when no usable tag is present.
const DEFAULT_SPEED_MPH: f64 = 30.0;

/// Annotates every arc with its great-circle length (km) and the
/// estimated time to traverse it (hours).
///
/// Runs exactly once, from [GraphBuilder::build](crate::GraphBuilder::build).
/// The computation only depends on endpoint coordinates and tags, so
/// re-running it over unchanged arcs would yield identical values.
pub(crate) fn compute_weights(vertices: &[Vertex], arcs: &mut [Arc]) {
    for arc in arcs.iter_mut() {
        let start = &vertices[arc.start];
        let end = &vertices[arc.end];
        let speed = average_speed(&arc.tags);
        arc.length = earth_distance(start.lat, start.lon, end.lat, end.lon);
        arc.travel_time = arc.length / speed;
        trace!("arc {}: {:.3} km at {:.1} km/h", arc.id, arc.length, speed);
    }
}

/// Estimates the average travel speed for an arc, in km/h,
/// already damped by [SPEED_DAMPENING].
///
/// Precedence: a parseable `maxspeed` tag, then the `highway`
/// classification table, then a [DEFAULT_SPEED_MPH] assumption. A
/// malformed `maxspeed` value is reported and falls through to the
/// next heuristic instead of failing the arc.
fn average_speed(tags: &Tags) -> f64 {
    if let Some(raw) = tags.get("maxspeed") {
        if let Some(kmh) = parse_maxspeed(raw) {
            return kmh * SPEED_DAMPENING;
        }
        warn!("malformed maxspeed tag {:?}, falling back to highway class", raw);
    }

    let mph = match tags.get("highway") {
        Some(class) => highway_speed_mph(class.trim()),
        None => DEFAULT_SPEED_MPH,
    };
    mph * KM_IN_MILE * SPEED_DAMPENING
}

/// Parses a `maxspeed` value into km/h.
///
/// `"30 mph"` and `"30mph"` are converted from mph; a bare number is
/// already km/h. Anything else is malformed.
fn parse_maxspeed(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if let Some(number) = raw.strip_suffix("mph") {
        number
            .trim_end()
            .parse::<u32>()
            .ok()
            .map(|mph| f64::from(mph) * KM_IN_MILE)
    } else {
        raw.parse::<u32>().ok().map(f64::from)
    }
}

/// Assumed average speed, in mph, for a `highway` classification.
/// Unknown classes get the same assumption as minor roads.
fn highway_speed_mph(class: &str) -> f64 {
    match class {
        "motorway" | "trunk" => 70.0,
        "primary" => 60.0,
        "secondary" => 50.0,
        "tertiary" => 40.0,
        "unclassified" | "residential" => 30.0,
        "service" => 10.0,
        "track" => 5.0,
        "motorway_link" | "trunk_link" => 65.0,
        "primary_link" => 55.0,
        "secondary_link" => 45.0,
        "tertiary_link" => 35.0,
        _ => 30.0,
    }
}
