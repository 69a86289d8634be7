//! Mass-aggregate particle physics for 2D games.
//!
//! `tether` advances point masses under forces and resolves the contacts
//! produced by links and ground. Designed for vehicles, rope bridges and
//! other rigs built from particles rather than rigid bodies.
//!
//! # Features
//!
//! - **Force generators**: Gravity, drag, springs, bungees, a closed-form
//!   stiff spring and tunable thrust
//! - **Links**: Rods, cables, half-rods (free or anchored), panels, segments
//! - **Terrain**: Polyline ground with bounded per-step lookup and ground
//!   normals for probe particles
//! - **Contact resolver**: Iterative impulse and penetration solver with
//!   deterministic ordering and adaptive iteration budget
//! - **Handles, not pointers**: Particles live in a generational arena
//! - **Observable**: Monitor each step via the `StepObserver` trait
//! - **`no_std` compatible**: Works in embedded and WASM environments
//!
//! # Example
//! ```
//! use tether::{World, Particle, Panel, Vector3};
//!
//! let mut world: World<f64> = World::new(16, 0);
//! let ball = world.add_particle(
//!     Particle::new(Vector3::new2(0.0, 1.0))
//!         .with_acceleration(Vector3::new2(0.0, -9.81)),
//! );
//! world.contact_registry_mut().add(
//!     Panel::new(ball, Vector3::zero(), Vector3::new2(0.0, 1.0), 0.5),
//! );
//! for _ in 0..120 {
//!     world.step(1.0 / 60.0);
//! }
//! assert!(world.particle(ball).unwrap().position.y > -0.05);
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vector;
pub mod particle;
pub mod force;
pub mod contact;
pub mod constraint;
pub mod segment;
pub mod terrain;
pub mod registry;
pub mod resolver;
pub mod world;
pub mod vehicle;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::{Float, Real};
pub use vector::Vector3;
pub use particle::{Particle, ParticleId, ParticleSet};
pub use force::{ForceGenerator, Gravity, Drag, Spring, AnchoredSpring, Bungee, AnchoredBungee, FakeSpring, Thrust};
pub use contact::ParticleContact;
pub use constraint::{ContactGenerator, Rod, AnchoredRod, Cable, AnchoredCable, HalfRod, AnchoredHalfRod, Panel, PanelBatch};
pub use segment::{Segment, SegmentHit, SegmentRegion};
pub use terrain::{Terrain, TerrainConfig, TerrainProbe, MAX_TERRAIN_PROBES};
pub use registry::{ForceRegistry, ForceGeneratorId, ContactRegistry, ContactGeneratorId};
pub use resolver::ContactResolver;
pub use world::World;
pub use vehicle::{Vehicle, VehicleConfig};
pub use config::WorldConfig;
pub use observer::{StepObserver, NoOpStepObserver};
pub use error::PhysicsError;
