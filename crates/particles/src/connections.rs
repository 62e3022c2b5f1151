//! Proximity lines between nearby particles.
//!
//! Two passes produce the same connection list in the same `(a, b)` order:
//! the O(n²) pairwise scan and a uniform grid with cells as wide as the
//! connection distance, where each particle only checks its 3×3 neighborhood.

use std::collections::HashMap;

use driftfield_core::geometry::falloff;
use driftfield_core::{DVec2, EngineError};
use serde::{Deserialize, Serialize};

/// How the connection pass finds close pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionMode {
    #[default]
    Pairwise,
    Grid,
}

impl ConnectionMode {
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "pairwise" => Ok(Self::Pairwise),
            "grid" => Ok(Self::Grid),
            other => Err(EngineError::InvalidParam {
                name: "connection_mode".to_string(),
                reason: format!("expected \"pairwise\" or \"grid\", got \"{other}\""),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Pairwise => "pairwise",
            Self::Grid => "grid",
        }
    }
}

/// A pair of particle indices (`a < b`) closer than the connection distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub distance: f64,
}

impl Connection {
    /// Line opacity: linear falloff over `reach`, scaled by `max_opacity`.
    pub fn opacity(&self, reach: f64, max_opacity: f64) -> f64 {
        falloff(self.distance, reach) * max_opacity
    }
}

/// Finds every pair closer than `reach` (strictly), ordered by `(a, b)`.
pub fn find(mode: ConnectionMode, positions: &[DVec2], reach: f64) -> Vec<Connection> {
    match mode {
        ConnectionMode::Pairwise => pairwise(positions, reach),
        ConnectionMode::Grid => grid(positions, reach),
    }
}

/// Checks every unordered pair.
pub fn pairwise(positions: &[DVec2], reach: f64) -> Vec<Connection> {
    let mut out = Vec::new();
    for (a, &pa) in positions.iter().enumerate() {
        for (offset, &pb) in positions[a + 1..].iter().enumerate() {
            let distance = pa.distance(pb);
            if distance < reach {
                out.push(Connection {
                    a,
                    b: a + 1 + offset,
                    distance,
                });
            }
        }
    }
    out
}

/// Buckets particles into `reach`-sized cells and checks neighboring cells only.
pub fn grid(positions: &[DVec2], reach: f64) -> Vec<Connection> {
    if reach.is_nan() || reach <= 0.0 {
        return Vec::new();
    }

    let cell_of = |p: DVec2| ((p.x / reach).floor() as i64, (p.y / reach).floor() as i64);
    let mut cells: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, &p) in positions.iter().enumerate() {
        cells.entry(cell_of(p)).or_default().push(i);
    }

    let mut out = Vec::new();
    let mut candidates = Vec::new();
    for (a, &pa) in positions.iter().enumerate() {
        let (cx, cy) = cell_of(pa);
        candidates.clear();
        for dy in -1..=1 {
            for dx in -1..=1 {
                if let Some(bucket) = cells.get(&(cx + dx, cy + dy)) {
                    candidates.extend(bucket.iter().copied().filter(|&b| b > a));
                }
            }
        }
        candidates.sort_unstable();
        for &b in &candidates {
            let distance = pa.distance(positions[b]);
            if distance < reach {
                out.push(Connection { a, b, distance });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftfield_core::Xorshift64;

    fn scatter(seed: u64, count: usize, w: f64, h: f64) -> Vec<DVec2> {
        let mut rng = Xorshift64::new(seed);
        (0..count)
            .map(|_| DVec2::new(rng.next_f64() * w, rng.next_f64() * h))
            .collect()
    }

    #[test]
    fn connects_at_119_not_at_120() {
        let near = [DVec2::new(0.0, 0.0), DVec2::new(119.0, 0.0)];
        let found = pairwise(&near, 120.0);
        assert_eq!(found.len(), 1);
        assert!((found[0].opacity(120.0, 0.3) - 0.0025).abs() < 1e-9);

        let edge = [DVec2::new(0.0, 0.0), DVec2::new(120.0, 0.0)];
        assert!(pairwise(&edge, 120.0).is_empty());
        assert!(grid(&edge, 120.0).is_empty());
    }

    #[test]
    fn pairs_are_ordered_with_a_below_b() {
        let points = [
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(20.0, 0.0),
        ];
        let pairs: Vec<_> = pairwise(&points, 120.0).iter().map(|c| (c.a, c.b)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn grid_matches_pairwise() {
        for seed in 1..20 {
            let points = scatter(seed, 120, 900.0, 500.0);
            assert_eq!(grid(&points, 120.0), pairwise(&points, 120.0));
        }
    }

    #[test]
    fn grid_handles_cell_boundaries() {
        let points = [
            DVec2::new(119.9, 0.0),
            DVec2::new(120.1, 0.0),
            DVec2::new(239.9, 0.0),
            DVec2::new(0.0, 0.0),
        ];
        assert_eq!(grid(&points, 120.0), pairwise(&points, 120.0));
    }

    #[test]
    fn zero_reach_connects_nothing() {
        let points = [DVec2::ZERO, DVec2::ZERO];
        assert!(pairwise(&points, 0.0).is_empty());
        assert!(grid(&points, 0.0).is_empty());
    }

    #[test]
    fn mode_names_round_trip() {
        for mode in [ConnectionMode::Pairwise, ConnectionMode::Grid] {
            assert_eq!(ConnectionMode::from_name(mode.name()).unwrap(), mode);
        }
        assert!(matches!(
            ConnectionMode::from_name("octree"),
            Err(EngineError::InvalidParam { .. })
        ));
    }

    #[test]
    fn find_dispatches_on_mode() {
        let points = scatter(3, 40, 300.0, 150.0);
        assert_eq!(
            find(ConnectionMode::Grid, &points, 120.0),
            find(ConnectionMode::Pairwise, &points, 120.0)
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn grid_and_pairwise_agree(
                seed in 1_u64..u64::MAX,
                count in 0_usize..80,
                reach in 1.0_f64..200.0,
            ) {
                let points = scatter(seed, count, 600.0, 400.0);
                prop_assert_eq!(grid(&points, reach), pairwise(&points, reach));
            }

            #[test]
            fn every_connection_is_within_reach(seed in 1_u64..u64::MAX, count in 0_usize..60) {
                let points = scatter(seed, count, 400.0, 300.0);
                for c in pairwise(&points, 120.0) {
                    prop_assert!(c.a < c.b);
                    prop_assert!(c.distance < 120.0);
                    let opacity = c.opacity(120.0, 0.3);
                    prop_assert!(opacity > 0.0 && opacity <= 0.3);
                }
            }
        }
    }
}
