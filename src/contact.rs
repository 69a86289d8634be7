//! Contact descriptors produced by link generators and consumed by the
//! resolver.

use crate::float::{Float, Real};
use crate::particle::{ParticleId, ParticleSet};
use crate::vector::Vector3;

/// One constraint violation for the current step.
///
/// `normal` points the way `particle` must move to resolve the contact.
/// `other` is `None` for contacts against fixed geometry.
#[derive(Copy, Clone, Debug, Default)]
pub struct ParticleContact<F: Float = Real> {
    pub particle: ParticleId,
    pub other: Option<ParticleId>,
    pub normal: Vector3<F>,
    /// Positive while overlapping.
    pub penetration: F,
    pub restitution: F,
    /// Displacement applied to each side by the last penetration
    /// resolution of this contact.
    pub(crate) movement: [Vector3<F>; 2],
}

impl<F: Float> ParticleContact<F> {
    pub fn new(
        particle: ParticleId,
        other: Option<ParticleId>,
        normal: Vector3<F>,
        penetration: F,
        restitution: F,
    ) -> Self {
        ParticleContact {
            particle,
            other,
            normal,
            penetration,
            restitution,
            movement: [Vector3::zero(); 2],
        }
    }

    pub fn movement(&self) -> [Vector3<F>; 2] { self.movement }

    /// Relative velocity along the normal; negative while closing.
    pub fn separating_velocity(&self, particles: &ParticleSet<F>) -> F {
        let mut relative = particles
            .get(self.particle)
            .map_or(Vector3::zero(), |p| p.velocity);
        if let Some(other) = self.other.and_then(|id| particles.get(id)) {
            relative -= other.velocity;
        }
        relative.dot(self.normal)
    }

    pub fn total_inverse_mass(&self, particles: &ParticleSet<F>) -> F {
        let first = particles.get(self.particle).map_or(F::zero(), |p| p.inverse_mass());
        let second = self
            .other
            .and_then(|id| particles.get(id))
            .map_or(F::zero(), |p| p.inverse_mass());
        first + second
    }

    /// Velocity then penetration resolution for a step of `delta`.
    pub fn resolve(&mut self, particles: &mut ParticleSet<F>, delta: F) {
        self.resolve_velocity(particles, delta);
        self.resolve_interpenetration(particles);
    }

    fn resolve_velocity(&mut self, particles: &mut ParticleSet<F>, delta: F) {
        let separating = self.separating_velocity(particles);
        if separating > F::zero() {
            return;
        }
        let total_inverse_mass = self.total_inverse_mass(particles);
        if total_inverse_mass <= F::zero() {
            return;
        }

        let mut new_separating = -separating * self.restitution;

        // Remove the closing speed that this step's base acceleration alone
        // produced, so resting contacts don't bounce under gravity.
        let mut acc_caused = particles
            .get(self.particle)
            .map_or(Vector3::zero(), |p| p.acceleration);
        if let Some(other) = self.other.and_then(|id| particles.get(id)) {
            acc_caused -= other.acceleration;
        }
        let acc_caused_separating = acc_caused.dot(self.normal) * delta;
        if acc_caused_separating < F::zero() {
            new_separating = new_separating + self.restitution * acc_caused_separating;
            new_separating = new_separating.max(F::zero());
        }

        let impulse = (new_separating - separating) / total_inverse_mass;
        let impulse_per_inverse_mass = self.normal.scale(impulse);

        if let Some(p) = particles.get_mut(self.particle) {
            let inverse_mass = p.inverse_mass();
            p.velocity = p.velocity.add_scaled(impulse_per_inverse_mass, inverse_mass);
        }
        if let Some(p) = self.other.and_then(|id| particles.get_mut(id)) {
            let inverse_mass = p.inverse_mass();
            p.velocity = p.velocity.add_scaled(impulse_per_inverse_mass, -inverse_mass);
        }
    }

    fn resolve_interpenetration(&mut self, particles: &mut ParticleSet<F>) {
        self.movement = [Vector3::zero(); 2];
        if self.penetration <= F::zero() {
            return;
        }
        let total_inverse_mass = self.total_inverse_mass(particles);
        if total_inverse_mass <= F::zero() {
            return;
        }

        let move_per_inverse_mass = self.normal.scale(self.penetration / total_inverse_mass);

        if let Some(p) = particles.get_mut(self.particle) {
            self.movement[0] = move_per_inverse_mass.scale(p.inverse_mass());
            p.position += self.movement[0];
        }
        if let Some(p) = self.other.and_then(|id| particles.get_mut(id)) {
            self.movement[1] = move_per_inverse_mass.scale(-p.inverse_mass());
            p.position += self.movement[1];
        }
        self.penetration = F::zero();
    }
}
