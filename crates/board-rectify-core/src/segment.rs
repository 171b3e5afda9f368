use nalgebra::Point2;

/// Maximum distance between the two reconstructed intersection points
/// (one on each segment) for them to count as the same point.
pub const SEGMENT_COINCIDENCE_TOL: f64 = 1e-5;

/// Intersection of the finite segments `[a1, a2]` and `[b1, b2]`.
///
/// Returns `None` when the segments are parallel or degenerate, or when the
/// crossing of their supporting lines is not on both segments. Absence of an
/// intersection is an ordinary result; callers decide whether it is fatal.
pub fn intersect_segments(
    a1: Point2<f64>,
    a2: Point2<f64>,
    b1: Point2<f64>,
    b2: Point2<f64>,
) -> Option<Point2<f64>> {
    let a = a2 - a1;
    let b = b2 - b1;
    let o = a1 - b1;

    let a_len_sq = a.dot(&a);
    let a_dot_b = a.dot(&b);
    let denom = a_len_sq * b.dot(&b) - a_dot_b * a_dot_b;
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }

    let u = (a_len_sq * b.dot(&o) - a_dot_b * a.dot(&o)) / denom;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let t = a.dot(&(u * b - o)) / a_len_sq;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    let on_a = a1 + t * a;
    let on_b = b1 + u * b;

    // Both reconstructions must agree; a near-singular system drifts apart here.
    if (on_a - on_b).norm() < SEGMENT_COINCIDENCE_TOL {
        Some(on_a)
    } else {
        None
    }
}
