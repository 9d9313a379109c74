//! Display-side path shaping. Nothing here feeds back into distance or
//! instruction computation except [`simplify`].

use itertools::Itertools;

use crate::models::PixelPoint;

/// Unsigned turn angle at `b`, in degrees. `None` when either leg has zero length.
pub fn turn_angle_deg(a: PixelPoint, b: PixelPoint, c: PixelPoint) -> Option<f64> {
    let (v1x, v1y) = (b.x - a.x, b.y - a.y);
    let (v2x, v2y) = (c.x - b.x, c.y - b.y);
    let l1 = v1x.hypot(v1y);
    let l2 = v2x.hypot(v2y);
    if l1 == 0.0 || l2 == 0.0 {
        return None;
    }
    let dot = ((v1x * v2x + v1y * v2y) / (l1 * l2)).clamp(-1.0, 1.0);
    Some(dot.acos().to_degrees())
}

fn simplify_once(path: &[PixelPoint], tolerance_deg: f64) -> Vec<PixelPoint> {
    let mut out = Vec::with_capacity(path.len());
    out.push(path[0]);
    out.extend(
        path.iter()
            .tuple_windows()
            .filter(|(a, b, c)| turn_angle_deg(**a, **b, **c).is_some_and(|deg| deg > tolerance_deg))
            .map(|(_, b, _)| *b),
    );
    out.push(path[path.len() - 1]);
    out
}

/// Drop interior points whose turn angle is within `tolerance_deg`.
///
/// Endpoints are always kept. Dropping a point changes its neighbours' angles,
/// so the pass repeats until nothing more is removed; the result is a fixpoint.
pub fn simplify(path: &[PixelPoint], tolerance_deg: f64) -> Vec<PixelPoint> {
    if path.len() <= 2 {
        return path.to_vec();
    }
    let mut current = simplify_once(path, tolerance_deg);
    loop {
        if current.len() <= 2 {
            return current;
        }
        let next = simplify_once(&current, tolerance_deg);
        if next.len() == current.len() {
            return next;
        }
        current = next;
    }
}

/// Number of sub-steps each segment is divided into.
pub fn smoothing_steps(smoothing_factor: f64) -> usize {
    let n = (10.0 * smoothing_factor).round();
    if n.is_finite() && n > 2.0 { n as usize } else { 2 }
}

fn catmull_rom(p0: PixelPoint, p1: PixelPoint, p2: PixelPoint, p3: PixelPoint, t: f64) -> PixelPoint {
    let t2 = t * t;
    let t3 = t2 * t;
    let b0 = -0.5 * t3 + t2 - 0.5 * t;
    let b1 = 1.5 * t3 - 2.5 * t2 + 1.0;
    let b2 = -1.5 * t3 + 2.0 * t2 + 0.5 * t;
    let b3 = 0.5 * t3 - 0.5 * t2;
    PixelPoint::new(
        b0 * p0.x + b1 * p1.x + b2 * p2.x + b3 * p3.x,
        b0 * p0.y + b1 * p1.y + b2 * p2.y + b3 * p3.y,
    )
}

/// Catmull-Rom interpolation through every point of `path`, ends clamped by
/// repeating the boundary point. Paths shorter than three points are returned as is.
pub fn smooth(path: &[PixelPoint], smoothing_factor: f64) -> Vec<PixelPoint> {
    if path.len() < 3 {
        return path.to_vec();
    }
    let steps = smoothing_steps(smoothing_factor);
    let last = path.len() - 1;
    let mut out = Vec::with_capacity(path.len() * steps);
    out.push(path[0]);
    for i in 0..last {
        let p0 = path[i.saturating_sub(1)];
        let p1 = path[i];
        let p2 = path[i + 1];
        let p3 = path[(i + 2).min(last)];
        for j in 1..steps {
            out.push(catmull_rom(p0, p1, p2, p3, j as f64 / steps as f64));
        }
        out.push(p2);
    }
    out
}
