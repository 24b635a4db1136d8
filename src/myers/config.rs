use thiserror::Error;

/// Errors from invalid engine configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The window capacity must be positive.
    #[error("maximum window length must be > 0")]
    ZeroWindow,
}

/// When the sweep may stop early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PruningPolicy {
    /// Stop once the running distance exceeds the columns still to scan plus
    /// the edit budget; no later column could get back within budget.
    #[default]
    RemainingColumns,
    /// Always scan the whole window.
    Disabled,
}

impl PruningPolicy {
    /// Largest running distance that can still end within `budget` when
    /// `remaining` columns are left to scan, or `None` if unbounded.
    #[inline]
    pub fn threshold(self, remaining: usize, budget: u32) -> Option<usize> {
        match self {
            PruningPolicy::RemainingColumns => Some(remaining + budget as usize),
            PruningPolicy::Disabled => None,
        }
    }
}

/// Configuration parameters for an alignment engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Largest `max_distance_in_ref` the buffers are sized for.
    pub max_window_len: usize,
    /// Early-exit policy.
    pub pruning: PruningPolicy,
}

impl EngineConfig {
    /// Configuration for windows of up to `max_window_len` with the default
    /// pruning policy.
    pub fn with_max_window(max_window_len: usize) -> Result<Self, ConfigError> {
        let config = Self {
            max_window_len,
            pruning: PruningPolicy::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the pruning policy.
    pub fn with_pruning(mut self, pruning: PruningPolicy) -> Self {
        self.pruning = pruning;
        self
    }

    /// Check invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_window_len == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_window_is_rejected() {
        assert_eq!(EngineConfig::with_max_window(0), Err(ConfigError::ZeroWindow));
    }

    #[test]
    fn builder_sets_pruning() {
        let config = EngineConfig::with_max_window(256)
            .unwrap()
            .with_pruning(PruningPolicy::Disabled);
        assert_eq!(config.max_window_len, 256);
        assert_eq!(config.pruning, PruningPolicy::Disabled);
        assert_eq!(config.pruning.threshold(10, 2), None);
        assert_eq!(PruningPolicy::RemainingColumns.threshold(10, 2), Some(12));
    }
}
