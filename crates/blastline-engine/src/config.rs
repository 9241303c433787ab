//! Engine and scrub worker configuration, validation, and error types.
//!
//! [`EngineConfig`] selects the tile merge policy and which auxiliary
//! projections the engine maintains. [`ScrubConfig`] sizes the request
//! channel of the background [`ScrubWorker`](crate::ScrubWorker).

use serde::{Deserialize, Serialize};

use crate::merge::MergePolicy;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`EngineConfig::validate`] and [`ScrubConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The tile projection was given a policy that only applies to counts.
    #[error("merge policy '{policy}' cannot reduce tile edits")]
    InvalidTilePolicy {
        /// The rejected policy.
        policy: MergePolicy,
    },
    /// The scrub request channel has zero capacity.
    #[error("scrub channel capacity must be at least 1")]
    ChannelCapacityZero,
}

// ── EngineConfig ───────────────────────────────────────────────────

/// Configuration for a [`TimelineEngine`](crate::TimelineEngine).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Policy used to reduce tile edits. Default: [`MergePolicy::Override`].
    pub tile_policy: MergePolicy,
    /// Maintain the derived path list. Default: true.
    pub collect_paths: bool,
    /// Maintain the per-cell path heat grid. Default: true.
    pub track_heat: bool,
    /// Move the cursor to the newest index after each batch. Default: true.
    pub advance_on_apply: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tile_policy: MergePolicy::Override,
            collect_paths: true,
            track_heat: true,
            advance_on_apply: true,
        }
    }
}

impl EngineConfig {
    /// Check that the configuration can drive an engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_policy == MergePolicy::Accumulate {
            return Err(ConfigError::InvalidTilePolicy {
                policy: self.tile_policy,
            });
        }
        Ok(())
    }
}

// ── ScrubConfig ────────────────────────────────────────────────────

/// Configuration for the background scrub worker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrubConfig {
    /// Capacity of the bounded request channel. Default: 64.
    pub channel_capacity: usize,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
        }
    }
}

impl ScrubConfig {
    /// Check that the worker can be started with this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::ChannelCapacityZero);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(ScrubConfig::default().validate().is_ok());
    }

    #[test]
    fn last_defined_is_a_valid_tile_policy() {
        let cfg = EngineConfig {
            tile_policy: MergePolicy::LastDefined,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn accumulate_tile_policy_fails() {
        let cfg = EngineConfig {
            tile_policy: MergePolicy::Accumulate,
            ..EngineConfig::default()
        };
        match cfg.validate() {
            Err(ConfigError::InvalidTilePolicy {
                policy: MergePolicy::Accumulate,
            }) => {}
            other => panic!("expected InvalidTilePolicy, got {other:?}"),
        }
    }

    #[test]
    fn zero_capacity_fails() {
        let cfg = ScrubConfig {
            channel_capacity: 0,
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ChannelCapacityZero));
        assert_eq!(
            ConfigError::ChannelCapacityZero.to_string(),
            "scrub channel capacity must be at least 1"
        );
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = EngineConfig {
            track_heat: false,
            ..EngineConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"tile_policy\":\"override\""));
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
