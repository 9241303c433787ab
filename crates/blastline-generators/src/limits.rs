//! Parameter bounds shared by the blast generators.
//!
//! Every blast loop terminates because its size and energy are finite and
//! bounded here; values outside these limits are rejected before a run
//! emits anything.

use blastline_core::Position;
use blastline_generator::GeneratorError;

/// Largest accepted blast radius, in cells.
pub const MAX_BLAST_SIZE: f64 = 1024.0;

/// Reject a `size` that is not finite or lies outside `[0, MAX_BLAST_SIZE]`.
pub(crate) fn check_size(key: &str, size: f64) -> Result<(), GeneratorError> {
    if !size.is_finite() || !(0.0..=MAX_BLAST_SIZE).contains(&size) {
        return Err(GeneratorError::invalid(
            key,
            format!("must be finite and within [0, {MAX_BLAST_SIZE}], got {size}"),
        ));
    }
    Ok(())
}

/// Reject a value that is not finite or is negative.
pub(crate) fn check_non_negative(key: &str, value: f64) -> Result<(), GeneratorError> {
    if !value.is_finite() || value < 0.0 {
        return Err(GeneratorError::invalid(key, format!("must be finite and >= 0, got {value}")));
    }
    Ok(())
}

/// Reject a centre whose swept square would leave the `i32` grid.
pub(crate) fn check_reach(center: Position, reach: i32) -> Result<(), GeneratorError> {
    for (key, c) in [("x", center.x), ("y", center.y)] {
        if c.checked_sub(reach).is_none() || c.checked_add(reach).is_none() {
            return Err(GeneratorError::invalid(
                key,
                format!("{c} is too close to the grid edge for reach {reach}"),
            ));
        }
    }
    Ok(())
}
