//! Container options.
//!
//! The container reads no configuration files; hosts that keep their
//! settings in one can embed [`ContainerOptions`] in their own config type
//! with the `config` feature, which derives serde support.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Default maximum resolution depth.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Tunables for a [`Container`](crate::Container).
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, ContainerOptions};
///
/// let options = ContainerOptions::default()
///     .with_max_depth(64)
///     .with_single_flight(true);
/// let container = Container::with_options(options);
/// assert_eq!(container.options().max_depth, 64);
/// assert!(container.options().auto_wiring);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerOptions {
    /// Resolution depth at which `make` fails with `DepthExceeded`.
    pub max_depth: usize,
    /// Construct unbound concrete types from their constructor metadata.
    pub auto_wiring: bool,
    /// Build each shared key at most once, even under concurrent first
    /// resolution. When off, concurrent first builds may both run and the
    /// first value stored is the one every caller receives. Two shared
    /// builds on different threads that need each other fail with
    /// `Circular` instead of waiting forever.
    pub single_flight: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            auto_wiring: true,
            single_flight: false,
        }
    }
}

impl ContainerOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_auto_wiring(mut self, enabled: bool) -> Self {
        self.auto_wiring = enabled;
        self
    }

    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.single_flight = enabled;
        self
    }
}
