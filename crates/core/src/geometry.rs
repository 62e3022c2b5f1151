//! Small geometry and easing helpers shared by the effects.

use glam::DVec2;

/// Sinusoidal offset `sin(phase) * amplitude`, the breathing term of a pulse.
pub fn pulse(phase: f64, amplitude: f64) -> f64 {
    phase.sin() * amplitude
}

/// Linear falloff from 1 at distance 0 to 0 at `reach`; 0 beyond `reach`.
///
/// Drives both the pointer repulsion force and the connection-line opacity.
pub fn falloff(distance: f64, reach: f64) -> f64 {
    if reach <= 0.0 || distance >= reach {
        0.0
    } else {
        (reach - distance) / reach
    }
}

/// Reflects a coordinate off `[0, max]`.
///
/// When `pos` lies outside the interval, the velocity component is negated and
/// the position clamped to the nearest edge. Returns the new `(pos, vel)`.
pub fn reflect(pos: f64, vel: f64, max: f64) -> (f64, f64) {
    if pos < 0.0 || pos > max {
        (pos.clamp(0.0, max.max(0.0)), -vel)
    } else {
        (pos, vel)
    }
}

/// Shortest distance from `p` to the segment `a`–`b`.
pub fn segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Coverage of a pixel whose center is `distance` from a shape edge at `edge`.
///
/// One pixel of linear antialiasing centered on the edge.
pub fn coverage(distance: f64, edge: f64) -> f64 {
    (edge + 0.5 - distance).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_is_zero_at_zero_phase() {
        assert_eq!(pulse(0.0, 0.5), 0.0);
        assert!((pulse(std::f64::consts::FRAC_PI_2, 0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn falloff_endpoints() {
        assert_eq!(falloff(0.0, 150.0), 1.0);
        assert_eq!(falloff(150.0, 150.0), 0.0);
        assert_eq!(falloff(200.0, 150.0), 0.0);
        assert!((falloff(75.0, 150.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn falloff_with_non_positive_reach_is_zero() {
        assert_eq!(falloff(0.0, 0.0), 0.0);
        assert_eq!(falloff(0.0, -1.0), 0.0);
    }

    #[test]
    fn reflect_inside_is_untouched() {
        assert_eq!(reflect(5.0, 1.0, 10.0), (5.0, 1.0));
        assert_eq!(reflect(10.0, 1.0, 10.0), (10.0, 1.0));
    }

    #[test]
    fn reflect_outside_clamps_and_negates() {
        assert_eq!(reflect(10.5, 0.5, 10.0), (10.0, -0.5));
        assert_eq!(reflect(-0.2, -0.3, 10.0), (0.0, 0.3));
    }

    #[test]
    fn reflect_on_zero_extent_pins_to_origin() {
        assert_eq!(reflect(0.4, 0.4, 0.0), (0.0, -0.4));
    }

    #[test]
    fn segment_distance_projects_onto_segment() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(10.0, 0.0);
        assert!((segment_distance(DVec2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        assert!((segment_distance(DVec2::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-12);
        assert!((segment_distance(DVec2::new(1.0, 1.0), a, a) - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn coverage_ramps_across_edge() {
        assert_eq!(coverage(0.0, 2.0), 1.0);
        assert_eq!(coverage(2.5, 2.0), 0.0);
        assert!((coverage(2.0, 2.0) - 0.5).abs() < 1e-12);
    }
}
