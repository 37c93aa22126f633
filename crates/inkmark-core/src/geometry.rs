//! Stateless geometry helpers shared by the eraser and the selector.
//!
//! Everything here works in scene space and is free of side effects.

use kurbo::{Point, Rect, Vec2};

/// Squared segment lengths below this are treated as a single point.
const DEGENERATE_EPSILON: f64 = 1e-12;

/// Roots closer than this are treated as a tangent touch.
const TANGENT_EPSILON: f64 = 1e-9;

/// Euclidean distance between two points.
pub fn distance(p: Point, q: Point) -> f64 {
    (p - q).hypot()
}

/// Distance from `point` to the closest point on segment `[v, w]`.
///
/// A degenerate segment (`v == w`) is treated as the single point `v`.
pub fn point_to_segment_distance(point: Point, v: Point, w: Point) -> f64 {
    let seg = w - v;
    let pv = point - v;
    let len_sq = seg.hypot2();
    if len_sq < DEGENERATE_EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    distance(point, lerp(v, w, t))
}

/// Point at parameter `t` along `[v, w]`.
pub fn lerp(v: Point, w: Point, t: f64) -> Point {
    v + (w - v) * t
}

/// Raw roots `t1 <= t2` of `|v + t·(w - v) - center|² = radius²`.
///
/// Returns `None` when the discriminant is negative (the line misses the
/// circle) or when the segment is degenerate. Roots are not clamped to
/// `[0, 1]`.
pub fn circle_segment_roots(v: Point, w: Point, center: Point, radius: f64) -> Option<(f64, f64)> {
    let d: Vec2 = w - v;
    let f: Vec2 = v - center;
    let a = d.dot(d);
    if a < DEGENERATE_EPSILON {
        return None;
    }
    let b = 2.0 * f.dot(d);
    let c = f.dot(f) - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_d = disc.sqrt();
    let t1 = (-b - sqrt_d) / (2.0 * a);
    let t2 = (-b + sqrt_d) / (2.0 * a);
    Some((t1.min(t2), t1.max(t2)))
}

/// How a segment relates to an erase circle.
///
/// Parameters are positions along the segment in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentClip {
    /// Both endpoints outside and the segment never enters the circle.
    FullyOutside,
    /// The whole segment is covered by the circle.
    FullyInside,
    /// Starts outside, enters the circle at `t` and stays inside.
    Enter { t: f64 },
    /// Starts inside and leaves the circle at `t`.
    Exit { t: f64 },
    /// Crosses the circle: enters at `enter`, leaves at `exit`.
    EnterAndExit { enter: f64, exit: f64 },
}

/// Classify segment `[v, w]` against the circle at `center` with `radius`.
///
/// An endpoint counts as inside when its distance is `<= radius`. When exactly
/// one root falls inside the segment, exactly one endpoint is inside and the
/// surviving part is the side of the outside endpoint.
pub fn circle_segment_clip(v: Point, w: Point, center: Point, radius: f64) -> SegmentClip {
    let v_outside = distance(v, center) > radius;
    let w_outside = distance(w, center) > radius;
    let by_endpoints = if v_outside && w_outside {
        SegmentClip::FullyOutside
    } else {
        SegmentClip::FullyInside
    };

    let Some((t1, t2)) = circle_segment_roots(v, w, center, radius) else {
        return by_endpoints;
    };

    let in_range = |t: f64| (0.0..=1.0).contains(&t);
    match (in_range(t1), in_range(t2)) {
        // A root at an endpoint on the circle edge belongs to that endpoint,
        // which is already inside.
        (true, true) => match (v_outside, w_outside) {
            (false, false) => SegmentClip::FullyInside,
            (false, true) => SegmentClip::Exit { t: t2 },
            (true, false) => SegmentClip::Enter { t: t1 },
            // grazing contact, nothing of the stroke is covered
            (true, true) if t2 - t1 <= TANGENT_EPSILON => SegmentClip::FullyOutside,
            (true, true) => SegmentClip::EnterAndExit { enter: t1, exit: t2 },
        },
        (true, false) | (false, true) => {
            let t = if in_range(t1) { t1 } else { t2 };
            if v_outside {
                SegmentClip::Enter { t }
            } else if w_outside {
                SegmentClip::Exit { t }
            } else {
                SegmentClip::FullyInside
            }
        }
        (false, false) => by_endpoints,
    }
}

/// Inclusive AABB overlap test: rectangles that only touch still intersect.
pub fn rects_intersect(a: Rect, b: Rect) -> bool {
    let a = a.abs();
    let b = b.abs();
    !(b.x0 > a.x1 || b.x1 < a.x0 || b.y0 > a.y1 || b.y1 < a.y0)
}

/// Axis-aligned bounding box of a point set, `None` if it is empty.
pub fn bounding_box(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    let init = Rect::from_points(*first, *first);
    Some(
        points
            .iter()
            .skip(1)
            .fold(init, |rect, p| rect.union_pt(*p)),
    )
}

/// Normalized rectangle spanned by two corner points.
pub fn rect_from_corners(a: Point, b: Point) -> Rect {
    Rect::from_points(a, b)
}
