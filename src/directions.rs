// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::f64::consts::PI;
use std::fmt;

use crate::{initial_bearing, Arc, Error, Graph, Route, VertexIndex};
use log::debug;

/// A compass quadrant, each spanning π/2 radians around its cardinal
/// bearing (north covers `[7π/4, 2π) ∪ [0, π/4)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compass {
    North,
    East,
    South,
    West,
}

impl Compass {
    /// Maps a bearing in `[0, 2π)` to its compass quadrant.
    pub fn from_bearing(bearing: f64) -> Self {
        if !(PI / 4.0..7.0 * PI / 4.0).contains(&bearing) {
            Self::North
        } else if bearing < 3.0 * PI / 4.0 {
            Self::East
        } else if bearing < 5.0 * PI / 4.0 {
            Self::South
        } else {
            Self::West
        }
    }
}

impl fmt::Display for Compass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::North => write!(f, "north"),
            Self::East => write!(f, "east"),
            Self::South => write!(f, "south"),
            Self::West => write!(f, "west"),
        }
    }
}

/// Which way a turn goes, as seen by the traveler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnSide {
    Left,
    Right,
}

impl fmt::Display for TurnSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Classifies a turn from the difference of the two leg bearings
/// (`bearing(prev, pivot) - bearing(pivot, next)`).
///
/// A difference of exactly 0 or ±π describes no turn at all and yields
/// `None`; callers must report it rather than guess a side.
fn turn_side(diff: f64) -> Option<TurnSide> {
    if (-PI < diff && diff < 0.0) || (PI < diff && diff < 2.0 * PI) {
        Some(TurnSide::Right)
    } else if (0.0 < diff && diff < PI) || (-2.0 * PI < diff && diff < -PI) {
        Some(TurnSide::Left)
    } else {
        None
    }
}

/// How a road is referred to in an instruction: by reference code if it
/// has one, else by name, else as "Unnamed Road".
///
/// The pair also serves as the road identity for change detection; two
/// labels are the same road only if both components match, with absent
/// values equal only to absent values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadLabel {
    pub reference: Option<String>,
    pub name: Option<String>,
}

impl RoadLabel {
    fn from_arc(arc: &Arc) -> Self {
        Self {
            reference: arc.tag("ref").map(str::to_string),
            name: arc.tag("name").map(str::to_string),
        }
    }
}

impl fmt::Display for RoadLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(reference) = &self.reference {
            write!(f, "{}", reference)
        } else if let Some(name) = &self.name {
            write!(f, "{}", name)
        } else {
            write!(f, "Unnamed Road")
        }
    }
}

/// What a single instruction asks the traveler to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Set off along the initial compass heading.
    Head(Compass),

    /// Turn onto another road.
    Turn(TurnSide),

    /// Take the n-th exit off a roundabout.
    RoundaboutExit(u32),
}

/// One turn-by-turn instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Position of this instruction within its [Directions] sequence.
    pub index: usize,

    /// Distance traveled since the previous instruction, in kilometers.
    /// Zero for the initial heading.
    pub distance_km: f64,

    pub action: Action,

    /// The road the instruction leads onto.
    pub road: RoadLabel,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.action {
            Action::Head(compass) => write!(f, "Travel {} along {}", compass, self.road),
            Action::Turn(side) => write!(
                f,
                "After {:.2} km, turn {} onto {}",
                self.distance_km, side, self.road
            ),
            Action::RoundaboutExit(exit) => write!(
                f,
                "After {:.2} km, take the {} exit on the roundabout, onto {}",
                self.distance_km,
                ordinal(*exit),
                self.road
            ),
        }
    }
}

fn ordinal(number: u32) -> String {
    match number {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        n => format!("{}th", n),
    }
}

/// The rendered result of a routing query: an ordered instruction
/// sequence plus route totals. Immutable once emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Directions {
    pub instructions: Vec<Instruction>,

    /// Sum of unweighted arc lengths along the route, in kilometers.
    pub total_distance_km: f64,

    /// Sum of time-weighted arc lengths along the route, in hours.
    pub total_time_hours: f64,
}

impl fmt::Display for Directions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            writeln!(f, "{}", instruction)?;
        }
        Ok(())
    }
}

/// Walks a found [Route] and emits natural-language instructions.
///
/// A new instruction is announced whenever the `(ref, name)` road
/// identity changes, with two exceptions: roundabout traversal is
/// deferred until the route leaves the ring (announced as a single
/// "take the n-th exit" instruction), and an identity change at a
/// vertex with two or fewer incident arcs is treated as a silent
/// continuation, since no actual choice of road existed there.
///
/// Returns [Error::MalformedRoundabout] if a roundabout on the route
/// cannot be walked to its exit, and [Error::UndefinedTurn] if three
/// consecutive route vertices describe neither a left nor a right turn.
pub fn synthesize_directions(g: &Graph, route: &Route) -> Result<Directions, Error> {
    let steps = route.steps();
    let mut instructions: Vec<Instruction> = Vec::new();
    let mut current_road: Option<RoadLabel> = None;
    let mut roundabout_entry: Option<VertexIndex> = None;
    let mut last_announced_km = 0.0;

    for j in 1..steps.len() {
        let Some(arc_idx) = steps[j].arc else { continue };
        let arc = g.arc(arc_idx);

        if arc.is_roundabout() {
            if roundabout_entry.is_none() {
                // Defer announcements until the route leaves the ring.
                roundabout_entry = Some(steps[j - 1].index);
            }
            continue;
        }

        if let Some(entry) = roundabout_entry.take() {
            let exits = exit_count(g, entry, steps[j].index)?;
            let road = RoadLabel::from_arc(arc);
            instructions.push(Instruction {
                index: instructions.len(),
                distance_km: steps[j - 1].distance_km - last_announced_km,
                action: Action::RoundaboutExit(exits),
                road: road.clone(),
            });
            last_announced_km = steps[j - 1].distance_km;
            current_road = Some(road);
            continue;
        }

        let road = RoadLabel::from_arc(arc);
        if current_road.as_ref() == Some(&road) {
            continue;
        }

        match &current_road {
            None => {
                let from = g.vertex(steps[j - 1].index);
                let to = g.vertex(steps[j].index);
                let bearing = initial_bearing(from.lat, from.lon, to.lat, to.lon);
                instructions.push(Instruction {
                    index: instructions.len(),
                    distance_km: 0.0,
                    action: Action::Head(Compass::from_bearing(bearing)),
                    road: road.clone(),
                });
            }
            Some(_) => {
                // Only announce at an actual choice point; road identity
                // changes at pass-through vertices are followed silently.
                let pivot = g.vertex(steps[j - 1].index);
                if pivot.arcs().len() > 2 {
                    let prev = g.vertex(steps[j - 2].index);
                    let next = g.vertex(steps[j].index);
                    let diff = initial_bearing(prev.lat, prev.lon, pivot.lat, pivot.lon)
                        - initial_bearing(pivot.lat, pivot.lon, next.lat, next.lon);
                    let side = turn_side(diff).ok_or(Error::UndefinedTurn(pivot.id))?;
                    instructions.push(Instruction {
                        index: instructions.len(),
                        distance_km: steps[j - 1].distance_km - last_announced_km,
                        action: Action::Turn(side),
                        road: road.clone(),
                    });
                    last_announced_km = steps[j - 1].distance_km;
                }
            }
        }
        current_road = Some(road);
    }

    debug!(
        "synthesized {} instructions over {} route vertices",
        instructions.len(),
        steps.len()
    );

    Ok(Directions {
        instructions,
        total_distance_km: route.total_distance_km(),
        total_time_hours: route.total_time_hours(),
    })
}

/// Counts roundabout exits between the ring vertex where a route joined
/// the roundabout and the first vertex off the ring where it leaves.
///
/// Walks the ring forward from `entry` (following the roundabout-tagged
/// arc starting at each ring vertex), counting every non-roundabout arc
/// that is traversable outward. Stops once a counted arc's far endpoint
/// is `exit`. A walk that cannot continue, or that comes back around to
/// `entry`, indicates malformed ring topology.
fn exit_count(g: &Graph, entry: VertexIndex, exit: VertexIndex) -> Result<u32, Error> {
    let mut current = entry;
    let mut exits: u32 = 0;

    loop {
        let mut next: Option<VertexIndex> = None;

        for &arc_idx in g.vertex(current).arcs() {
            let arc = g.arc(arc_idx);
            if arc.is_roundabout() {
                if arc.start() == current {
                    next = Some(arc.end());
                }
            } else if arc.start() == current && arc.direction().allows_start_to_end() {
                exits += 1;
                if arc.end() == exit {
                    return Ok(exits);
                }
            } else if arc.end() == current && arc.direction().allows_end_to_start() {
                exits += 1;
                if arc.start() == exit {
                    return Ok(exits);
                }
            }
        }

        current = next.ok_or(Error::MalformedRoundabout(g.vertex(current).id))?;
        if current == entry {
            return Err(Error::MalformedRoundabout(g.vertex(entry).id));
        }
    }
}
