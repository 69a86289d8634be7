//! Point masses and the handle-based arena that stores them.

use crate::error::PhysicsError;
use crate::float::{Float, Real};
use crate::vector::Vector3;
use alloc::vec::Vec;

/// A point mass with no rotational state.
///
/// Mass is stored inverted: an inverse mass of zero is an immovable
/// particle, which integration, forces and contact resolution all leave
/// in place.
#[derive(Clone, Debug)]
pub struct Particle<F: Float = Real> {
    pub position: Vector3<F>,
    pub velocity: Vector3<F>,
    /// Constant base acceleration (e.g. gravity), applied every step on top
    /// of accumulated forces.
    pub acceleration: Vector3<F>,
    /// Fraction of velocity kept per second, in (0, 1].
    pub damping: F,
    inverse_mass: F,
    force_accum: Vector3<F>,
}

impl<F: Float> Particle<F> {
    /// Unit-mass particle at rest with no damping.
    pub fn new(position: Vector3<F>) -> Self {
        Particle {
            position,
            velocity: Vector3::zero(),
            acceleration: Vector3::zero(),
            damping: F::one(),
            inverse_mass: F::one(),
            force_accum: Vector3::zero(),
        }
    }

    /// An immovable particle (infinite mass).
    pub fn immovable(position: Vector3<F>) -> Self {
        let mut p = Particle::new(position);
        p.inverse_mass = F::zero();
        p
    }

    pub fn with_mass(mut self, mass: F) -> Self {
        self.set_mass(mass);
        self
    }

    pub fn with_velocity(mut self, velocity: Vector3<F>) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vector3<F>) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn with_damping(mut self, damping: F) -> Self {
        debug_assert!(damping > F::zero() && damping <= F::one(), "damping must be in (0, 1]");
        self.damping = damping;
        self
    }

    /// Set the mass.
    ///
    /// # Panics
    /// If `mass <= 0`; use [`Particle::try_set_mass`] for untrusted input.
    pub fn set_mass(&mut self, mass: F) {
        assert!(mass > F::zero(), "particle mass must be positive");
        self.inverse_mass = F::one() / mass;
    }

    pub fn try_set_mass(&mut self, mass: F) -> Result<(), PhysicsError> {
        if !(mass > F::zero()) || mass >= F::max_value() {
            return Err(PhysicsError::InvalidMass);
        }
        self.inverse_mass = F::one() / mass;
        Ok(())
    }

    /// Mass, or `F::max_value()` for an immovable particle.
    pub fn mass(&self) -> F {
        if self.inverse_mass == F::zero() {
            F::max_value()
        } else {
            F::one() / self.inverse_mass
        }
    }

    pub fn set_inverse_mass(&mut self, inverse_mass: F) {
        debug_assert!(inverse_mass >= F::zero(), "inverse mass cannot be negative");
        self.inverse_mass = inverse_mass;
    }

    pub fn set_infinite_mass(&mut self) {
        self.inverse_mass = F::zero();
    }

    pub fn inverse_mass(&self) -> F { self.inverse_mass }

    pub fn has_finite_mass(&self) -> bool {
        self.inverse_mass > F::zero()
    }

    /// Add a force to be applied at the next integration only.
    pub fn add_force(&mut self, force: Vector3<F>) {
        self.force_accum += force;
    }

    pub fn accumulated_force(&self) -> Vector3<F> { self.force_accum }

    pub fn clear_accumulator(&mut self) {
        self.force_accum = Vector3::zero();
    }

    /// Advance by `delta` seconds (Euler-Cromer style: position uses the
    /// velocity from before this step's acceleration).
    pub fn integrate(&mut self, delta: F) {
        if self.inverse_mass <= F::zero() {
            return;
        }

        self.position = self.position.add_scaled(self.velocity, delta);

        let resulting = self.acceleration.add_scaled(self.force_accum, self.inverse_mass);
        self.velocity = self.velocity.add_scaled(resulting, delta);
        self.velocity *= self.damping.powf(delta);

        self.clear_accumulator();
    }

    pub fn kinetic_energy(&self) -> F {
        if !self.has_finite_mass() {
            return F::zero();
        }
        F::half() * self.mass() * self.velocity.square_magnitude()
    }
}

/// Generational handle to a particle stored in a [`ParticleSet`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ParticleId {
    index: u32,
    generation: u32,
}

impl ParticleId {
    pub fn index(self) -> usize { self.index as usize }
}

struct Slot<F: Float> {
    generation: u32,
    particle: Option<Particle<F>>,
    /// Position in `live` while occupied.
    live_index: usize,
}

/// Arena of particles addressed by [`ParticleId`].
///
/// Removed slots are reused with a bumped generation, so a stale handle
/// never reaches a newer particle.
pub struct ParticleSet<F: Float = Real> {
    slots: Vec<Slot<F>>,
    free: Vec<u32>,
    live: Vec<ParticleId>,
}

impl<F: Float> ParticleSet<F> {
    pub fn new() -> Self {
        ParticleSet { slots: Vec::new(), free: Vec::new(), live: Vec::new() }
    }

    pub fn insert(&mut self, particle: Particle<F>) -> ParticleId {
        let live_index = self.live.len();
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.particle = Some(particle);
                slot.live_index = live_index;
                ParticleId { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, particle: Some(particle), live_index });
                ParticleId { index, generation: 0 }
            }
        };
        self.live.push(id);
        id
    }

    /// Remove a particle, handing it back to the caller.
    ///
    /// The live list is updated by swap-and-pop, so iteration order is not
    /// preserved across removals.
    pub fn remove(&mut self, id: ParticleId) -> Option<Particle<F>> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        let particle = slot.particle.take()?;
        let live_index = slot.live_index;
        slot.generation = slot.generation.wrapping_add(1);

        self.live.swap_remove(live_index);
        if let Some(moved) = self.live.get(live_index).copied() {
            self.slots[moved.index()].live_index = live_index;
        }
        self.free.push(id.index);
        Some(particle)
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle<F>> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.particle.as_ref())
    }

    pub fn get_mut(&mut self, id: ParticleId) -> Option<&mut Particle<F>> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.particle.as_mut())
    }

    pub fn contains(&self, id: ParticleId) -> bool {
        self.get(id).is_some()
    }

    /// Live handles, in tracking order.
    pub fn ids(&self) -> &[ParticleId] { &self.live }

    pub fn iter(&self) -> impl Iterator<Item = (ParticleId, &Particle<F>)> + '_ {
        self.live.iter().filter_map(move |&id| self.get(id).map(|p| (id, p)))
    }

    pub fn len(&self) -> usize { self.live.len() }

    pub fn is_empty(&self) -> bool { self.live.is_empty() }

    pub(crate) fn for_each_mut(&mut self, mut f: impl FnMut(&mut Particle<F>)) {
        for slot in self.slots.iter_mut() {
            if let Some(p) = slot.particle.as_mut() {
                f(p);
            }
        }
    }
}

impl<F: Float> Default for ParticleSet<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_handle_does_not_alias_reused_slot() {
        let mut set: ParticleSet<f64> = ParticleSet::new();
        let a = set.insert(Particle::new(Vector3::new2(1.0, 0.0)));
        assert!(set.remove(a).is_some());
        let b = set.insert(Particle::new(Vector3::new2(2.0, 0.0)));
        assert_eq!(a.index(), b.index());
        assert!(set.get(a).is_none());
        assert_eq!(set.get(b).map(|p| p.position.x), Some(2.0));
    }

    #[test]
    fn swap_remove_keeps_remaining_handles_valid() {
        let mut set: ParticleSet<f64> = ParticleSet::new();
        let ids: Vec<_> = (0..4)
            .map(|i| set.insert(Particle::new(Vector3::new2(i as f64, 0.0))))
            .collect();
        set.remove(ids[1]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.ids(), &[ids[0], ids[3], ids[2]]);
        set.remove(ids[3]);
        assert_eq!(set.ids(), &[ids[0], ids[2]]);
        assert_eq!(set.get(ids[2]).map(|p| p.position.x), Some(2.0));
    }

    #[test]
    fn try_set_mass_rejects_non_positive() {
        let mut p: Particle<f64> = Particle::new(Vector3::zero());
        assert_eq!(p.try_set_mass(0.0), Err(PhysicsError::InvalidMass));
        assert_eq!(p.try_set_mass(-2.0), Err(PhysicsError::InvalidMass));
        assert!(p.try_set_mass(4.0).is_ok());
        assert_eq!(p.inverse_mass(), 0.25);
    }

    #[test]
    #[should_panic]
    fn set_mass_zero_panics() {
        let mut p: Particle<f64> = Particle::new(Vector3::zero());
        p.set_mass(0.0);
    }

    #[test]
    fn damping_decays_per_second() {
        let mut p: Particle<f64> = Particle::new(Vector3::zero())
            .with_velocity(Vector3::new2(10.0, 0.0))
            .with_damping(0.5);
        for _ in 0..4 {
            p.integrate(0.25);
        }
        assert!((p.velocity.x - 5.0).abs() < 1e-9, "velocity = {}", p.velocity.x);
    }
}
