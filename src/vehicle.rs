//! A two-wheeled vehicle rig assembled from world particles, links and
//! force generators.
//!
//! The rig owns fixed-size tables of the handles it registered. Their
//! layout is part of the API:
//!
//! - `frame[0..4]`: chassis corners rear-bottom, front-bottom, front-top,
//!   rear-top. `wheels[0..2]`: rear, front.
//! - links `0..4` chassis outline rods, `4..6` the cross frame, `6..10`
//!   suspension travel limits (cable then half-rod, rear then front),
//!   `10..12` trailing-arm rods from each wheel to the opposite bottom
//!   corner.
//! - force registrations `0..6` gravity (frame then wheels), `6..14`
//!   suspension springs (wheel side then frame side, per strut), `14..16`
//!   engine thrust on the rear and front wheel.

use crate::constraint::{Cable, ContactGenerator, HalfRod, Rod};
use crate::error::PhysicsError;
use crate::float::{Float, Real};
use crate::force::{ForceGenerator, Gravity, Spring, Thrust};
use crate::particle::{Particle, ParticleId};
use crate::registry::{ContactGeneratorId, ForceGeneratorId};
use crate::vector::Vector3;
use crate::world::World;
use alloc::vec::Vec;

pub const FRAME_LINKS: usize = 12;
pub const FORCE_REGISTRATIONS: usize = 16;

/// Tuning for a [`Vehicle`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VehicleConfig<F: Float = Real> {
    /// Mass of each chassis corner.
    pub body_mass: F,
    pub wheel_mass: F,
    pub wheel_radius: F,
    /// Distance between the bottom chassis corners (and the wheels).
    pub wheelbase: F,
    pub body_height: F,
    /// Rest distance from each bottom corner down to its wheel.
    pub ride_height: F,
    /// How far a wheel may travel either side of the ride height.
    pub suspension_travel: F,
    pub spring_constant: F,
    /// Engine force per wheel at full throttle.
    pub gas_power: F,
    pub gravity: Vector3<F>,
    pub damping: F,
}

impl<F: Float> VehicleConfig<F> {
    pub fn new() -> Self {
        VehicleConfig {
            body_mass: F::from_f32(4.0),
            wheel_mass: F::one(),
            wheel_radius: F::from_f32(0.4),
            wheelbase: F::from_f32(3.0),
            body_height: F::one(),
            ride_height: F::from_f32(0.8),
            suspension_travel: F::from_f32(0.3),
            spring_constant: F::from_f32(400.0),
            gas_power: F::from_f32(60.0),
            gravity: Vector3::new2(F::zero(), F::from_f32(-9.81)),
            damping: F::from_f32(0.95),
        }
    }

    pub fn with_wheel_radius(mut self, radius: F) -> Self {
        self.wheel_radius = radius;
        self
    }

    pub fn with_spring_constant(mut self, spring_constant: F) -> Self {
        self.spring_constant = spring_constant;
        self
    }

    pub fn with_gas_power(mut self, gas_power: F) -> Self {
        self.gas_power = gas_power;
        self
    }

    pub fn with_gravity(mut self, gravity: Vector3<F>) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.body_mass > F::zero()) || !(self.wheel_mass > F::zero()) {
            return Err(PhysicsError::InvalidMass);
        }
        if !(self.damping > F::zero()) || self.damping > F::one() {
            return Err(PhysicsError::InvalidDamping);
        }
        if !(self.wheel_radius > F::zero()) {
            return Err(PhysicsError::InvalidConfig("wheel radius must be positive"));
        }
        if !(self.wheelbase > F::zero()) || !(self.body_height > F::zero()) {
            return Err(PhysicsError::InvalidConfig("chassis dimensions must be positive"));
        }
        if self.suspension_travel < F::zero() || !(self.ride_height > self.suspension_travel) {
            return Err(PhysicsError::InvalidConfig("ride height must exceed suspension travel"));
        }
        Ok(())
    }
}

impl<F: Float> Default for VehicleConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handles for one vehicle living in a [`World`].
pub struct Vehicle<F: Float = Real> {
    frame: [ParticleId; 4],
    wheels: [ParticleId; 2],
    links: [ContactGeneratorId; FRAME_LINKS],
    forces: [(ParticleId, ForceGeneratorId); FORCE_REGISTRATIONS],
    engines: [ForceGeneratorId; 2],
    terrain: Option<ContactGeneratorId>,
    throttle: F,
    config: VehicleConfig<F>,
}

impl<F: Float> Vehicle<F> {
    /// Build the rig with its rear-bottom corner at `origin`.
    pub fn spawn(world: &mut World<F>, origin: Vector3<F>, config: VehicleConfig<F>) -> Result<Self, PhysicsError> {
        config.validate()?;

        let across = Vector3::new2(config.wheelbase, F::zero());
        let up = Vector3::new2(F::zero(), config.body_height);
        let down = Vector3::new2(F::zero(), -config.ride_height);

        let corner = |position: Vector3<F>| {
            Particle::new(position).with_mass(config.body_mass).with_damping(config.damping)
        };
        let wheel = |position: Vector3<F>| {
            Particle::new(position).with_mass(config.wheel_mass).with_damping(config.damping)
        };

        let frame = [
            world.add_particle(corner(origin)),
            world.add_particle(corner(origin + across)),
            world.add_particle(corner(origin + across + up)),
            world.add_particle(corner(origin + up)),
        ];
        let wheels = [
            world.add_particle(wheel(origin + down)),
            world.add_particle(wheel(origin + across + down)),
        ];

        let diagonal = (across + up).magnitude();
        let arm = (across + down).magnitude();
        let max_travel = config.ride_height + config.suspension_travel;
        let min_travel = config.ride_height - config.suspension_travel;

        let contacts = world.contact_registry_mut();
        let links = [
            contacts.add(Rod::new(frame[0], frame[1], config.wheelbase)),
            contacts.add(Rod::new(frame[1], frame[2], config.body_height)),
            contacts.add(Rod::new(frame[2], frame[3], config.wheelbase)),
            contacts.add(Rod::new(frame[3], frame[0], config.body_height)),
            contacts.add(Rod::new(frame[0], frame[2], diagonal)),
            contacts.add(Rod::new(frame[1], frame[3], diagonal)),
            contacts.add(Cable::new(wheels[0], frame[0], max_travel, F::zero())),
            contacts.add(HalfRod::new(wheels[0], frame[0], min_travel)),
            contacts.add(Cable::new(wheels[1], frame[1], max_travel, F::zero())),
            contacts.add(HalfRod::new(wheels[1], frame[1], min_travel)),
            contacts.add(Rod::new(wheels[0], frame[1], arm)),
            contacts.add(Rod::new(wheels[1], frame[0], arm)),
        ];

        let strut_top = (up - down).magnitude();
        let k = config.spring_constant;
        let registry = world.force_registry_mut();
        let gravity = registry.add_generator(Gravity::new(config.gravity));
        let struts = [
            (wheels[0], frame[0], config.ride_height),
            (wheels[0], frame[3], strut_top),
            (wheels[1], frame[1], config.ride_height),
            (wheels[1], frame[2], strut_top),
        ];
        let mut springs = [(frame[0], gravity); 8];
        for (i, &(wheel, chassis, rest)) in struts.iter().enumerate() {
            springs[2 * i] = (wheel, registry.add_generator(Spring::new(chassis, k, rest)));
            springs[2 * i + 1] = (chassis, registry.add_generator(Spring::new(wheel, k, rest)));
        }
        let forward = Vector3::new2(F::one(), F::zero());
        let engines = [
            registry.add_generator(Thrust::new(forward, F::zero())),
            registry.add_generator(Thrust::new(forward, F::zero())),
        ];

        let forces = [
            (frame[0], gravity),
            (frame[1], gravity),
            (frame[2], gravity),
            (frame[3], gravity),
            (wheels[0], gravity),
            (wheels[1], gravity),
            springs[0],
            springs[1],
            springs[2],
            springs[3],
            springs[4],
            springs[5],
            springs[6],
            springs[7],
            (wheels[0], engines[0]),
            (wheels[1], engines[1]),
        ];
        for &(particle, generator) in &forces {
            registry.add(particle, generator);
        }

        log::debug!("spawned vehicle: {} links, {} force registrations", FRAME_LINKS, FORCE_REGISTRATIONS);

        Ok(Vehicle { frame, wheels, links, forces, engines, terrain: None, throttle: F::zero(), config })
    }

    /// Register both wheels as probes on a terrain generator.
    pub fn attach_to_terrain(&mut self, world: &mut World<F>, terrain: ContactGeneratorId) -> Result<(), PhysicsError> {
        let Some(ContactGenerator::Terrain(ground)) = world.contact_registry_mut().get_mut(terrain) else {
            return Err(PhysicsError::InvalidConfig("generator is not a terrain"));
        };
        ground.add_probe(self.wheels[0], self.config.wheel_radius)?;
        if let Err(err) = ground.add_probe(self.wheels[1], self.config.wheel_radius) {
            ground.remove_probe(self.wheels[0]);
            return Err(err);
        }
        self.terrain = Some(terrain);
        Ok(())
    }

    /// Throttle in [-1, 1]; negative reverses.
    pub fn set_throttle(&mut self, throttle: F) {
        self.throttle = throttle.clamp(-F::one(), F::one());
    }

    pub fn throttle(&self) -> F { self.throttle }

    /// Ground normal under wheel `index` from the last step, if touching.
    pub fn wheel_contact_normal(&self, world: &World<F>, index: usize) -> Option<Vector3<F>> {
        let wheel = *self.wheels.get(index)?;
        match world.contact_registry().get(self.terrain?)? {
            ContactGenerator::Terrain(ground) => ground
                .probes()
                .iter()
                .find(|p| p.particle == wheel)
                .and_then(|p| p.contact_normal()),
            _ => None,
        }
    }

    pub fn wheel_grounded(&self, world: &World<F>, index: usize) -> bool {
        self.wheel_contact_normal(world, index).is_some()
    }

    /// Point each engine along the ground under its wheel. Call once per
    /// step before [`World::step`]; airborne wheels get no drive.
    pub fn update_drive(&self, world: &mut World<F>) {
        let drive = self.throttle * self.config.gas_power;
        for i in 0..2 {
            let normal = self.wheel_contact_normal(world, i);
            if let Some(ForceGenerator::Thrust(engine)) = world.force_registry_mut().generator_mut(self.engines[i]) {
                match normal {
                    Some(normal) => {
                        engine.direction = normal.perp();
                        engine.magnitude = drive;
                    }
                    None => engine.magnitude = F::zero(),
                }
            }
        }
    }

    /// Centre of the chassis.
    pub fn position(&self, world: &World<F>) -> Option<Vector3<F>> {
        let mut sum = Vector3::zero();
        for &id in &self.frame {
            sum += world.particle(id)?.position;
        }
        Some(sum.scale(F::one() / F::from_usize(self.frame.len())))
    }

    pub fn frame(&self) -> &[ParticleId; 4] { &self.frame }

    pub fn wheels(&self) -> &[ParticleId; 2] { &self.wheels }

    pub fn links(&self) -> &[ContactGeneratorId; FRAME_LINKS] { &self.links }

    /// The two diagonal chassis rods.
    pub fn cross_frame(&self) -> &[ContactGeneratorId] { &self.links[4..6] }

    pub fn force_registrations(&self) -> &[(ParticleId, ForceGeneratorId); FORCE_REGISTRATIONS] { &self.forces }

    pub fn config(&self) -> &VehicleConfig<F> { &self.config }

    /// Unregister everything and hand the particles back, frame first.
    pub fn despawn(self, world: &mut World<F>) -> Vec<Particle<F>> {
        if let Some(terrain) = self.terrain {
            if let Some(ContactGenerator::Terrain(ground)) = world.contact_registry_mut().get_mut(terrain) {
                for &wheel in &self.wheels {
                    ground.remove_probe(wheel);
                }
            }
        }
        for &link in &self.links {
            world.contact_registry_mut().remove(link);
        }
        for &(particle, generator) in &self.forces {
            let registry = world.force_registry_mut();
            registry.remove(particle, generator);
            if !registry.registrations().iter().any(|&(_, g)| g == generator) {
                registry.remove_generator(generator);
            }
        }

        log::debug!("despawned vehicle");

        self.frame
            .iter()
            .chain(self.wheels.iter())
            .filter_map(|&id| world.remove_particle(id).ok())
            .collect()
    }
}
