//! Force generators: gravity, drag, springs, bungees and thrust.
//!
//! A generator computes one force for one particle for the current step
//! and adds it to that particle's accumulator. It never moves the particle
//! itself.

use crate::float::{Float, Real};
use crate::particle::{Particle, ParticleId, ParticleSet};
use crate::vector::Vector3;

/// A force source that can be registered against particles.
#[derive(Clone, Debug)]
pub enum ForceGenerator<F: Float = Real> {
    Gravity(Gravity<F>),
    Drag(Drag<F>),
    Spring(Spring<F>),
    AnchoredSpring(AnchoredSpring<F>),
    Bungee(Bungee<F>),
    AnchoredBungee(AnchoredBungee<F>),
    FakeSpring(FakeSpring<F>),
    Thrust(Thrust<F>),
}

impl<F: Float> ForceGenerator<F> {
    /// Apply this generator's force to `target` for a step of `delta`.
    ///
    /// Does nothing if `target` (or a partner particle) has been removed.
    pub fn update_force(&self, target: ParticleId, particles: &mut ParticleSet<F>, delta: F) {
        let force = {
            let Some(particle) = particles.get(target) else { return };
            match self {
                ForceGenerator::Gravity(g) => g.force(particle),
                ForceGenerator::Drag(g) => g.force(particle),
                ForceGenerator::Spring(g) => particles
                    .get(g.other)
                    .and_then(|other| g.force(particle, other.position)),
                ForceGenerator::AnchoredSpring(g) => g.force(particle),
                ForceGenerator::Bungee(g) => particles
                    .get(g.other)
                    .and_then(|other| g.force(particle, other.position)),
                ForceGenerator::AnchoredBungee(g) => g.force(particle),
                ForceGenerator::FakeSpring(g) => g.force(particle, delta),
                ForceGenerator::Thrust(g) => g.force(particle),
            }
        };
        if let (Some(force), Some(particle)) = (force, particles.get_mut(target)) {
            particle.add_force(force);
        }
    }
}

/// Hooke's law along `position - anchor`: pulls toward the anchor when
/// stretched past `rest_length`, pushes away when compressed.
fn hooke<F: Float>(position: Vector3<F>, anchor: Vector3<F>, rest_length: F, spring_constant: F) -> Vector3<F> {
    let offset = position - anchor;
    let length = offset.magnitude();
    offset.normalize().scale((rest_length - length) * spring_constant)
}

/// Constant gravitational acceleration scaled by each particle's mass.
#[derive(Copy, Clone, Debug)]
pub struct Gravity<F: Float = Real> {
    pub gravity: Vector3<F>,
}

impl<F: Float> Gravity<F> {
    pub fn new(gravity: Vector3<F>) -> Self { Gravity { gravity } }

    pub fn force(&self, particle: &Particle<F>) -> Option<Vector3<F>> {
        if !particle.has_finite_mass() {
            return None;
        }
        Some(self.gravity.scale(particle.mass()))
    }
}

/// Linear plus quadratic drag: `-(k1 |v| + k2 |v|^2) v̂`.
#[derive(Copy, Clone, Debug)]
pub struct Drag<F: Float = Real> {
    pub k1: F,
    pub k2: F,
}

impl<F: Float> Drag<F> {
    pub fn new(k1: F, k2: F) -> Self { Drag { k1, k2 } }

    pub fn force(&self, particle: &Particle<F>) -> Option<Vector3<F>> {
        if particle.velocity.is_near_zero(F::epsilon()) {
            return None;
        }
        let speed = particle.velocity.magnitude();
        let coefficient = self.k1 * speed + self.k2 * speed * speed;
        Some(particle.velocity.normalize().scale(-coefficient))
    }
}

/// Spring between the target particle and another particle.
///
/// Register it against each end (with the partner swapped) for a
/// symmetric spring.
#[derive(Copy, Clone, Debug)]
pub struct Spring<F: Float = Real> {
    pub other: ParticleId,
    pub spring_constant: F,
    pub rest_length: F,
}

impl<F: Float> Spring<F> {
    pub fn new(other: ParticleId, spring_constant: F, rest_length: F) -> Self {
        Spring { other, spring_constant, rest_length }
    }

    pub fn force(&self, particle: &Particle<F>, other: Vector3<F>) -> Option<Vector3<F>> {
        Some(hooke(particle.position, other, self.rest_length, self.spring_constant))
    }
}

/// Spring between the target particle and a fixed point.
#[derive(Copy, Clone, Debug)]
pub struct AnchoredSpring<F: Float = Real> {
    pub anchor: Vector3<F>,
    pub spring_constant: F,
    pub rest_length: F,
}

impl<F: Float> AnchoredSpring<F> {
    pub fn new(anchor: Vector3<F>, spring_constant: F, rest_length: F) -> Self {
        AnchoredSpring { anchor, spring_constant, rest_length }
    }

    pub fn force(&self, particle: &Particle<F>) -> Option<Vector3<F>> {
        Some(hooke(particle.position, self.anchor, self.rest_length, self.spring_constant))
    }
}

/// Spring that only pulls: no force while shorter than the rest length.
#[derive(Copy, Clone, Debug)]
pub struct Bungee<F: Float = Real> {
    pub other: ParticleId,
    pub spring_constant: F,
    pub rest_length: F,
}

impl<F: Float> Bungee<F> {
    pub fn new(other: ParticleId, spring_constant: F, rest_length: F) -> Self {
        Bungee { other, spring_constant, rest_length }
    }

    pub fn force(&self, particle: &Particle<F>, other: Vector3<F>) -> Option<Vector3<F>> {
        if particle.position.distance(other) < self.rest_length {
            return None;
        }
        Some(hooke(particle.position, other, self.rest_length, self.spring_constant))
    }
}

/// Bungee to a fixed point.
#[derive(Copy, Clone, Debug)]
pub struct AnchoredBungee<F: Float = Real> {
    pub anchor: Vector3<F>,
    pub spring_constant: F,
    pub rest_length: F,
}

impl<F: Float> AnchoredBungee<F> {
    pub fn new(anchor: Vector3<F>, spring_constant: F, rest_length: F) -> Self {
        AnchoredBungee { anchor, spring_constant, rest_length }
    }

    pub fn force(&self, particle: &Particle<F>) -> Option<Vector3<F>> {
        if particle.position.distance(self.anchor) < self.rest_length {
            return None;
        }
        Some(hooke(particle.position, self.anchor, self.rest_length, self.spring_constant))
    }
}

/// Stiff spring to a fixed point solved in closed form.
///
/// Predicts where a damped harmonic oscillator (rest length zero) would put
/// the particle after `delta`, then emits the force that reaches that
/// position in one step. Stays stable at spring constants that would blow
/// up an explicit spring.
#[derive(Copy, Clone, Debug)]
pub struct FakeSpring<F: Float = Real> {
    pub anchor: Vector3<F>,
    pub spring_constant: F,
    pub damping: F,
}

impl<F: Float> FakeSpring<F> {
    pub fn new(anchor: Vector3<F>, spring_constant: F, damping: F) -> Self {
        FakeSpring { anchor, spring_constant, damping }
    }

    pub fn force(&self, particle: &Particle<F>, delta: F) -> Option<Vector3<F>> {
        if !particle.has_finite_mass() || delta <= F::zero() {
            return None;
        }

        // Only the underdamped branch has a closed form here.
        let discriminant = F::from_f32(4.0) * self.spring_constant - self.damping * self.damping;
        if discriminant <= F::zero() {
            return None;
        }
        let gamma = F::half() * discriminant.sqrt();

        let position = particle.position - self.anchor;
        let velocity = particle.velocity;
        let c = position.scale(self.damping / (F::two() * gamma)) + velocity.scale(F::one() / gamma);

        let target = (position.scale((gamma * delta).cos()) + c.scale((gamma * delta).sin()))
            .scale((-F::half() * delta * self.damping).exp());

        let acceleration = (target - position).scale(F::one() / (delta * delta)) - velocity.scale(F::one() / delta);
        Some(acceleration.scale(particle.mass()))
    }
}

/// Constant force along a tunable direction; zero when `magnitude` is zero.
#[derive(Copy, Clone, Debug)]
pub struct Thrust<F: Float = Real> {
    pub direction: Vector3<F>,
    pub magnitude: F,
}

impl<F: Float> Thrust<F> {
    pub fn new(direction: Vector3<F>, magnitude: F) -> Self {
        Thrust { direction: direction.normalize(), magnitude }
    }

    pub fn force(&self, particle: &Particle<F>) -> Option<Vector3<F>> {
        if !particle.has_finite_mass() || self.magnitude == F::zero() {
            return None;
        }
        Some(self.direction.scale(self.magnitude))
    }
}

impl<F: Float> From<Gravity<F>> for ForceGenerator<F> {
    fn from(g: Gravity<F>) -> Self { ForceGenerator::Gravity(g) }
}

impl<F: Float> From<Drag<F>> for ForceGenerator<F> {
    fn from(g: Drag<F>) -> Self { ForceGenerator::Drag(g) }
}

impl<F: Float> From<Spring<F>> for ForceGenerator<F> {
    fn from(g: Spring<F>) -> Self { ForceGenerator::Spring(g) }
}

impl<F: Float> From<AnchoredSpring<F>> for ForceGenerator<F> {
    fn from(g: AnchoredSpring<F>) -> Self { ForceGenerator::AnchoredSpring(g) }
}

impl<F: Float> From<Bungee<F>> for ForceGenerator<F> {
    fn from(g: Bungee<F>) -> Self { ForceGenerator::Bungee(g) }
}

impl<F: Float> From<AnchoredBungee<F>> for ForceGenerator<F> {
    fn from(g: AnchoredBungee<F>) -> Self { ForceGenerator::AnchoredBungee(g) }
}

impl<F: Float> From<FakeSpring<F>> for ForceGenerator<F> {
    fn from(g: FakeSpring<F>) -> Self { ForceGenerator::FakeSpring(g) }
}

impl<F: Float> From<Thrust<F>> for ForceGenerator<F> {
    fn from(g: Thrust<F>) -> Self { ForceGenerator::Thrust(g) }
}
