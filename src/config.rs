//! Configuration types for the particle world.

/// Construction parameters for a [`World`](crate::world::World).
///
/// # Builder Pattern
/// ```
/// use tether::config::WorldConfig;
///
/// let config = WorldConfig::new()
///     .with_max_contacts(64)
///     .with_iterations(0);
/// assert!(config.is_adaptive());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Capacity of the per-step contact buffer. Contacts beyond this are
    /// silently dropped. Default: 256.
    pub max_contacts: usize,
    /// Resolver iterations per step. Zero selects adaptive mode: twice the
    /// number of contacts generated that step. Default: 0.
    pub iterations: usize,
}

impl WorldConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        WorldConfig {
            max_contacts: 256,
            iterations: 0,
        }
    }

    /// Set the contact buffer capacity.
    pub fn with_max_contacts(mut self, max_contacts: usize) -> Self {
        self.max_contacts = max_contacts;
        self
    }

    /// Set a fixed iteration count, or zero for adaptive.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn is_adaptive(&self) -> bool {
        self.iterations == 0
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new()
    }
}
