//! Four-neighbour flood expansion path tracers.
//!
//! Produces path records only; no tile is ever edited. Each expansion
//! step records one segment per neighbour, marked `collision` when the
//! neighbour already carries a record, `done` when it would exceed the
//! depth limit, and `continue` when it is queued for expansion.

use std::collections::VecDeque;

use blastline_core::{EditRecord, EndType, PathData, PointF, Position, Side2D};
use blastline_generator::{GenContext, Generator, GeneratorError, ParamSpec, ParamValues};
use smallvec::SmallVec;

use crate::radius::int_coord;

/// Which end of the work list expansion pops from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpandOrder {
    /// Pop the most recently queued cell.
    DepthFirst,
    /// Pop the oldest queued cell.
    BreadthFirst,
}

/// Flood expansion from a start cell.
#[derive(Clone, Copy, Debug)]
pub struct PathExpansion {
    order: ExpandOrder,
}

impl PathExpansion {
    /// Expansion with the given pop order.
    pub fn new(order: ExpandOrder) -> Self {
        Self { order }
    }

    /// Depth-first expansion.
    pub fn depth_first() -> Self {
        Self::new(ExpandOrder::DepthFirst)
    }

    /// Breadth-first expansion.
    pub fn breadth_first() -> Self {
        Self::new(ExpandOrder::BreadthFirst)
    }

    /// The configured pop order.
    pub fn order(&self) -> ExpandOrder {
        self.order
    }
}

impl Generator for PathExpansion {
    fn id(&self) -> &str {
        match self.order {
            ExpandOrder::DepthFirst => "random:expand.depth_first",
            ExpandOrder::BreadthFirst => "random:expand.breadth_first",
        }
    }

    fn description(&self) -> &str {
        match self.order {
            ExpandOrder::DepthFirst => "Expands pathing from tile to tile moving deep before broad",
            ExpandOrder::BreadthFirst => {
                "Expands pathing from tile to tile moving broad before deep"
            }
        }
    }

    fn source_prefix(&self) -> &str {
        match self.order {
            ExpandOrder::DepthFirst => "expandDepthFirst",
            ExpandOrder::BreadthFirst => "expandBreadthFirst",
        }
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::int("x", "X", 6),
            ParamSpec::int("y", "Y", 6),
            ParamSpec::int("maxDepth", "Max depth", 10),
        ]
    }

    fn run(&self, ctx: &mut GenContext<'_>, params: &ParamValues) -> Result<(), GeneratorError> {
        let origin = Position::new(
            int_coord(params.get_int("x")?, "x")?,
            int_coord(params.get_int("y")?, "y")?,
        );
        let max_depth = params.get_int("maxDepth")?;
        let max_depth = u32::try_from(max_depth).map_err(|_| {
            GeneratorError::invalid("maxDepth", format!("must be >= 0, got {max_depth}"))
        })?;

        let mut work: VecDeque<(Position, u32)> = VecDeque::from([(origin, 0)]);
        loop {
            let popped = match self.order {
                ExpandOrder::DepthFirst => work.pop_back(),
                ExpandOrder::BreadthFirst => work.pop_front(),
            };
            let Some((pos, depth)) = popped else {
                break;
            };

            let neighbours: SmallVec<[Position; 4]> =
                Side2D::ALL.iter().map(|side| pos.step(*side)).collect();
            for next in neighbours {
                let end_type = if ctx.visited(next) {
                    EndType::Collision
                } else if depth + 1 >= max_depth {
                    EndType::Done
                } else {
                    work.push_back((next, depth + 1));
                    EndType::Continue
                };
                let path = PathData::segment(PointF::center_of(pos), PointF::center_of(next))
                    .end_type(end_type);
                ctx.emit(Some("pathing"), EditRecord::at(next).path(path));
            }
        }
        Ok(())
    }
}
