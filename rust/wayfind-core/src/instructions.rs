//! Turn-by-turn text from a simplified pixel path.

use std::collections::VecDeque;

use crate::models::{path_length, PixelPoint};
use crate::options::RouteOptions;

/// Turns remembered for curve detection.
const TURN_WINDOW: usize = 3;
/// Same-direction turns in a row that count as one curve.
const CONSECUTIVE_TURNS: usize = 2;

pub const ALREADY_THERE: &str = "You are already at your destination.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnDirection {
    Straight,
    Left,
    Right,
}

impl TurnDirection {
    fn leg(self, meters: f64) -> String {
        match self {
            TurnDirection::Straight => format!("Walk straight for {:.1} meters", meters),
            TurnDirection::Left => format!("Turn left and continue for {:.1} meters", meters),
            TurnDirection::Right => format!("Turn right and continue for {:.1} meters", meters),
        }
    }

    fn closing(self, meters: f64) -> String {
        match self {
            TurnDirection::Straight => format!("Continue straight for {:.1} meters to your destination", meters),
            TurnDirection::Left => format!("Turn left for {:.1} meters to your destination", meters),
            TurnDirection::Right => format!("Turn right for {:.1} meters to your destination", meters),
        }
    }
}

fn walk_to_destination(meters: f64) -> String {
    format!("Walk straight for {:.1} meters to your destination", meters)
}

#[derive(Clone, Debug)]
pub struct InstructionGenerator {
    pub pixel_to_meter: f64,
    pub angle_threshold_deg: f64,
    /// Legs shorter than this are folded into the next one.
    pub min_segment_meters: f64,
}

impl InstructionGenerator {
    pub fn new(pixel_to_meter: f64, angle_threshold_deg: f64) -> Self {
        Self { pixel_to_meter, angle_threshold_deg, min_segment_meters: crate::options::DEFAULT_MIN_SEGMENT_METERS }
    }

    pub fn from_options(opts: &RouteOptions) -> Self {
        Self {
            pixel_to_meter: opts.pixel_to_meter,
            angle_threshold_deg: opts.angle_threshold_deg,
            min_segment_meters: opts.min_segment_meters,
        }
    }

    /// Direction of the turn at `cur`: sign of the cross product of the two legs,
    /// positive is left. `None` when a leg has zero length.
    pub fn classify_turn(&self, prev: PixelPoint, cur: PixelPoint, next: PixelPoint) -> Option<TurnDirection> {
        let (v1x, v1y) = (cur.x - prev.x, cur.y - prev.y);
        let (v2x, v2y) = (next.x - cur.x, next.y - cur.y);
        let (l1, l2) = (v1x.hypot(v1y), v2x.hypot(v2y));
        if l1 == 0.0 || l2 == 0.0 {
            return None;
        }
        let (v1x, v1y, v2x, v2y) = (v1x / l1, v1y / l1, v2x / l2, v2y / l2);
        let angle = (v1x * v2x + v1y * v2y).clamp(-1.0, 1.0).acos().to_degrees();
        if angle <= self.angle_threshold_deg {
            return Some(TurnDirection::Straight);
        }
        let cross = v1x * v2y - v1y * v2x;
        Some(if cross > 0.0 { TurnDirection::Left } else { TurnDirection::Right })
    }

    pub fn generate(&self, path: &[PixelPoint]) -> Vec<String> {
        if path.len() < 2 {
            return vec![ALREADY_THERE.to_string()];
        }
        let meters = |a: PixelPoint, b: PixelPoint| a.distance(&b) * self.pixel_to_meter;
        if path.len() == 2 {
            return vec![walk_to_destination(meters(path[0], path[1]))];
        }

        let mut out = Vec::new();
        let mut current = TurnDirection::Straight;
        let mut accumulated = meters(path[0], path[1]);
        let mut recent: VecDeque<TurnDirection> = VecDeque::with_capacity(TURN_WINDOW + 1);

        for i in 1..path.len() - 1 {
            let leg = meters(path[i], path[i + 1]);
            if let Some(dir) = self.classify_turn(path[i - 1], path[i], path[i + 1]) {
                recent.push_back(dir);
                if recent.len() > TURN_WINDOW {
                    recent.pop_front();
                }
                let run = recent.iter().rev().take_while(|&&d| d == dir).count();
                let curve = dir != TurnDirection::Straight && run >= CONSECUTIVE_TURNS;

                let long_enough = accumulated >= self.min_segment_meters;
                let emit = (dir != current && long_enough)
                    || (curve && current == TurnDirection::Straight && accumulated > 0.0);
                if emit {
                    out.push(current.leg(accumulated));
                    accumulated = 0.0;
                    current = dir;
                }
            }
            accumulated += leg;
        }

        if accumulated >= self.min_segment_meters {
            out.push(current.closing(accumulated));
        }
        if out.is_empty() {
            out.push(walk_to_destination(path_length(path) * self.pixel_to_meter));
        }
        out
    }
}
