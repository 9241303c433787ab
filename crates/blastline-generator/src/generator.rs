//! The [`Generator`] trait.

use serde::{Deserialize, Serialize};

use crate::context::GenContext;
use crate::error::GeneratorError;
use crate::params::{ParamSpec, ParamValues};

/// A simulation that turns a grid and a parameter set into edit records.
///
/// # Contract
///
/// - `run()` MUST be deterministic for a given grid, parameter set and
///   context seed.
/// - Generators never mutate the grid. All output goes through
///   [`GenContext::emit`].
/// - On error the caller discards the partial log.
///
/// # Object safety
///
/// This trait is object-safe; registries store generators as
/// `Box<dyn Generator>`.
pub trait Generator: Send + Sync {
    /// Stable identifier, e.g. `minecraft:tnt`.
    fn id(&self) -> &str;

    /// One-line human-readable description.
    fn description(&self) -> &str;

    /// Prefix of the source keys this generator's runs are tagged with.
    fn source_prefix(&self) -> &str;

    /// Parameter schema with defaults.
    fn params(&self) -> Vec<ParamSpec>;

    /// Execute one run, emitting records into `ctx`.
    fn run(&self, ctx: &mut GenContext<'_>, params: &ParamValues) -> Result<(), GeneratorError>;

    /// Serializable summary for listing generators to a UI.
    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            id: self.id().to_string(),
            description: self.description().to_string(),
            source_prefix: self.source_prefix().to_string(),
            params: self.params(),
        }
    }
}

/// Static description of a [`Generator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratorInfo {
    /// See [`Generator::id`].
    pub id: String,
    /// See [`Generator::description`].
    pub description: String,
    /// See [`Generator::source_prefix`].
    pub source_prefix: String,
    /// See [`Generator::params`].
    pub params: Vec<ParamSpec>,
}
