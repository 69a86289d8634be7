//! Error types for physics operations.

use core::fmt;

/// Errors that can occur while building or editing a simulation.
///
/// Numerical edge cases inside a step (immovable pairs, buffer overflow,
/// exhausted iteration budget) are handled by policy and never surface here.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Mass must be positive and finite.
    InvalidMass,
    /// Damping must be in (0, 1].
    InvalidDamping,
    /// Restitution must be in [0, 1].
    InvalidRestitution,
    /// The particle handle does not refer to a live particle.
    ParticleNotFound,
    /// Terrain vertices must be strictly increasing in X.
    UnsortedTerrain { index: usize },
    /// Terrain needs at least two vertices.
    DegenerateTerrain,
    /// The terrain generator tracks a bounded number of probes.
    TooManyProbes { max: usize },
    /// A configuration value is out of range.
    InvalidConfig(&'static str),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::InvalidMass => write!(f, "mass must be positive and finite"),
            PhysicsError::InvalidDamping => write!(f, "damping must be in (0, 1]"),
            PhysicsError::InvalidRestitution => write!(f, "restitution must be in [0, 1]"),
            PhysicsError::ParticleNotFound => write!(f, "particle handle is stale or unknown"),
            PhysicsError::UnsortedTerrain { index } => {
                write!(f, "terrain vertex {} is not to the right of its predecessor", index)
            }
            PhysicsError::DegenerateTerrain => write!(f, "terrain needs at least two vertices"),
            PhysicsError::TooManyProbes { max } => {
                write!(f, "terrain already tracks the maximum of {} probes", max)
            }
            PhysicsError::InvalidConfig(what) => write!(f, "invalid configuration: {}", what),
        }
    }
}
