//! Reference generators for the Blastline simulation framework.
//!
//! | Generator | Family |
//! |---|---|
//! | [`EnergyRaytraceBlast`] | energy-limited raytrace (TNT) |
//! | [`LargeBlast`] | yaw-slice raytrace (nuclear) |
//! | [`RadiusBlast`] | feathered radius replacement (antimatter) |
//! | [`EmpBlast`] | feathered radius substitution / power drain |
//! | [`PathExpansion`] | depth- or breadth-first flood path tracer |
//! | [`BoxFill`] | rectangle fill for seeding maps |

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod emp;
pub mod expand;
pub mod fill;
pub mod large_blast;
pub mod limits;
pub mod radius;
pub mod raytrace;
pub(crate) mod sweep;

pub use emp::{EmpBlast, EmpBlastBuilder};
pub use expand::{ExpandOrder, PathExpansion};
pub use fill::{BoxFill, BoxFillBuilder, TileChance};
pub use large_blast::LargeBlast;
pub use limits::MAX_BLAST_SIZE;
pub use radius::RadiusBlast;
pub use raytrace::{EnergyRaytraceBlast, RaytraceSettings};

use blastline_generator::Generator;

/// Every reference generator with its default configuration.
pub fn library() -> Vec<Box<dyn Generator>> {
    vec![
        Box::new(EnergyRaytraceBlast),
        Box::new(LargeBlast),
        Box::new(RadiusBlast),
        Box::new(EmpBlast::default()),
        Box::new(PathExpansion::depth_first()),
        Box::new(PathExpansion::breadth_first()),
        Box::new(BoxFill::default()),
    ]
}

/// The library generator with the given id.
pub fn find(id: &str) -> Option<Box<dyn Generator>> {
    library().into_iter().find(|g| g.id() == id)
}
