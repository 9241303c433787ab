//! Shared column sweep and feathered radius test for replacement blasts.
//!
//! Both [`RadiusBlast`](crate::RadiusBlast) and [`EmpBlast`](crate::EmpBlast)
//! visit every cell of the square `[-reach, reach]²` around the centre,
//! column by column, and decide per cell whether it is inside the
//! (feathered) blast radius.

use blastline_core::{PointF, Position};
use blastline_generator::GeneratorError;

use crate::limits::{check_reach, check_size};

/// One visited cell of a [`sweep`].
pub(crate) struct SweepCell {
    /// Absolute position.
    pub pos: Position,
    /// Squared distance from the centre.
    pub distance_sq: i64,
    /// Pathing phase of the cell's column.
    pub phase: String,
    /// Centre of the previous cell in the column.
    pub start: PointF,
    /// Centre of this cell.
    pub end: PointF,
}

/// Pathing phase name for column offset `dx`: `pathing-`, `pathing-n3`, `pathing-p3`.
pub(crate) fn column_phase(dx: i32) -> String {
    match dx {
        0 => "pathing-".to_string(),
        d if d < 0 => format!("pathing-n{}", d.unsigned_abs()),
        d => format!("pathing-p{d}"),
    }
}

/// Half-width of the swept square for `radius`.
pub(crate) fn reach(radius: f64) -> i32 {
    radius.ceil() as i32
}

/// Visit every cell within `reach` of `center`, columns west to east,
/// rows north to south.
pub(crate) fn sweep(
    center: Position,
    reach: i32,
    mut visit: impl FnMut(SweepCell) -> Result<(), GeneratorError>,
) -> Result<(), GeneratorError> {
    for dx in -reach..=reach {
        let phase = column_phase(dx);
        let mut last_y = center.y - reach;
        for dy in -reach..=reach {
            let pos = Position::new(center.x + dx, center.y + dy);
            visit(SweepCell {
                pos,
                distance_sq: i64::from(dx) * i64::from(dx) + i64::from(dy) * i64::from(dy),
                phase: phase.clone(),
                start: PointF::new(f64::from(pos.x) + 0.5, f64::from(last_y) + 0.5),
                end: PointF::center_of(pos),
            })?;
            last_y = pos.y;
        }
    }
    Ok(())
}

/// Radius test with a probabilistic outer rim.
///
/// Cells whose `floor(r² - d²)` falls below `floor(r² * feathering)` are
/// kept with a probability that rises linearly towards the inner edge of
/// the rim.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Feather {
    radius_sq: f64,
    edge: f64,
}

impl Feather {
    pub(crate) fn new(radius: f64, feathering: f64) -> Self {
        let radius_sq = radius * radius;
        Self {
            radius_sq,
            edge: (radius_sq * feathering).floor(),
        }
    }

    /// Whether the cell at `distance_sq` is affected. Draws from `random`
    /// only for cells inside the radius and on the rim.
    pub(crate) fn affects(&self, distance_sq: i64, random: impl FnOnce() -> f64) -> bool {
        let d2 = distance_sq as f64;
        if d2 > self.radius_sq {
            return false;
        }
        let delta = (self.radius_sq - d2).floor();
        if delta < self.edge {
            let p = 1.0 - delta / self.edge;
            return random() > p;
        }
        true
    }
}

/// Validate the shared `size`/`feathering` parameters and the swept
/// square around `center`.
pub(crate) fn check_radius(
    center: Position,
    size: f64,
    feathering: f64,
) -> Result<(), GeneratorError> {
    check_size("size", size)?;
    if !(0.0..=1.0).contains(&feathering) {
        return Err(GeneratorError::invalid(
            "feathering",
            format!("must be within [0, 1], got {feathering}"),
        ));
    }
    check_reach(center, reach(size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn column_phase_names() {
        assert_eq!(column_phase(0), "pathing-");
        assert_eq!(column_phase(-4), "pathing-n4");
        assert_eq!(column_phase(2), "pathing-p2");
    }

    #[test]
    fn sweep_visits_square_column_major() {
        let mut seen = Vec::new();
        sweep(Position::new(10, 10), 1, |c| {
            seen.push(c.pos);
            Ok(())
        })
        .unwrap();
        assert_eq!(seen.len(), 9);
        assert_eq!(seen[0], Position::new(9, 9));
        assert_eq!(seen[1], Position::new(9, 10));
        assert_eq!(seen[3], Position::new(10, 9));
    }

    #[test]
    fn first_segment_of_a_column_is_degenerate() {
        let mut first = None;
        sweep(Position::new(0, 0), 2, |c| {
            if first.is_none() {
                first = Some((c.start, c.end));
            }
            Ok(())
        })
        .unwrap();
        let (start, end) = first.unwrap();
        assert_eq!(start, end);
    }

    #[test]
    fn zero_feathering_is_a_crisp_edge() {
        let f = Feather::new(5.0, 0.0);
        assert!(f.affects(25, || unreachable!()));
        assert!(f.affects(0, || unreachable!()));
        assert!(!f.affects(26, || unreachable!()));
    }

    #[test]
    fn rim_cells_depend_on_the_draw() {
        let f = Feather::new(10.0, 0.5);
        // delta = 100 - 90 = 10 < edge 50, p = 0.8
        assert!(f.affects(90, || 0.9));
        assert!(!f.affects(90, || 0.5));
        // delta = 100 - 40 = 60 >= 50, no draw
        assert!(f.affects(40, || unreachable!()));
    }

    proptest! {
        #[test]
        fn feather_stays_inside_the_radius(
            radius in 0.0f64..60.0,
            feathering in 0.0f64..=1.0,
            distance_sq in 0i64..5000,
            draw in 0.0f64..1.0,
        ) {
            let f = Feather::new(radius, feathering);
            if f.affects(distance_sq, || draw) {
                prop_assert!(distance_sq as f64 <= radius * radius);
            }
            prop_assert!(f.affects(0, || draw));
        }

        #[test]
        fn sweep_covers_the_full_square(reach in 0i32..12, x in -20i32..20, y in -20i32..20) {
            let mut count = 0usize;
            sweep(Position::new(x, y), reach, |_| {
                count += 1;
                Ok(())
            })
            .unwrap();
            let side = (2 * reach + 1) as usize;
            prop_assert_eq!(count, side * side);
        }
    }
}
