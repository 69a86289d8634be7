//! The particle world: owns particles, generators and the contact buffer,
//! and advances them one step at a time.

use crate::config::WorldConfig;
use crate::contact::ParticleContact;
use crate::error::PhysicsError;
use crate::float::{Float, Real};
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::particle::{Particle, ParticleId, ParticleSet};
use crate::registry::{ContactRegistry, ForceRegistry};
use crate::resolver::ContactResolver;
use alloc::vec;
use alloc::vec::Vec;

/// Runs the step: clear forces, apply forces, integrate, generate
/// contacts, resolve contacts.
pub struct World<F: Float = Real> {
    particles: ParticleSet<F>,
    forces: ForceRegistry<F>,
    contact_generators: ContactRegistry<F>,
    contacts: Vec<ParticleContact<F>>,
    contact_count: usize,
    resolver: ContactResolver,
    adaptive_iterations: bool,
}

impl<F: Float> World<F> {
    /// World with a buffer of `max_contacts`; `iterations == 0` resolves
    /// with twice the number of contacts each step.
    pub fn new(max_contacts: usize, iterations: usize) -> Self {
        Self::with_config(WorldConfig::new().with_max_contacts(max_contacts).with_iterations(iterations))
    }

    pub fn with_config(config: WorldConfig) -> Self {
        log::debug!(
            "creating particle world: max_contacts={} iterations={}",
            config.max_contacts,
            config.iterations
        );
        World {
            particles: ParticleSet::new(),
            forces: ForceRegistry::new(),
            contact_generators: ContactRegistry::new(),
            contacts: vec![ParticleContact::default(); config.max_contacts],
            contact_count: 0,
            resolver: ContactResolver::new(config.iterations),
            adaptive_iterations: config.is_adaptive(),
        }
    }

    pub fn add_particle(&mut self, particle: Particle<F>) -> ParticleId {
        self.particles.insert(particle)
    }

    /// Stop simulating a particle and hand it back.
    ///
    /// Its force registrations are dropped and it is detached from every
    /// contact generator; generators that cannot act without it are
    /// removed.
    pub fn remove_particle(&mut self, id: ParticleId) -> Result<Particle<F>, PhysicsError> {
        let particle = self.particles.remove(id).ok_or(PhysicsError::ParticleNotFound)?;
        self.forces.remove_particle(id);
        self.contact_generators.remove_particle(id);
        Ok(particle)
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle<F>> {
        self.particles.get(id)
    }

    pub fn particle_mut(&mut self, id: ParticleId) -> Option<&mut Particle<F>> {
        self.particles.get_mut(id)
    }

    pub fn particles(&self) -> &ParticleSet<F> { &self.particles }

    pub fn particles_mut(&mut self) -> &mut ParticleSet<F> { &mut self.particles }

    pub fn force_registry(&self) -> &ForceRegistry<F> { &self.forces }

    pub fn force_registry_mut(&mut self) -> &mut ForceRegistry<F> { &mut self.forces }

    pub fn contact_registry(&self) -> &ContactRegistry<F> { &self.contact_generators }

    pub fn contact_registry_mut(&mut self) -> &mut ContactRegistry<F> { &mut self.contact_generators }

    pub fn resolver(&self) -> &ContactResolver { &self.resolver }

    pub fn max_contacts(&self) -> usize { self.contacts.len() }

    /// Contacts generated by the last step (after resolution).
    pub fn contacts(&self) -> &[ParticleContact<F>] {
        &self.contacts[..self.contact_count]
    }

    /// Clear every particle's force accumulator.
    pub fn start_frame(&mut self) {
        self.particles.for_each_mut(|p| p.clear_accumulator());
    }

    /// Apply every registered force once.
    pub fn apply_forces(&mut self, delta: F) {
        self.forces.update_forces(&mut self.particles, delta);
    }

    pub fn integrate(&mut self, delta: F) {
        self.particles.for_each_mut(|p| p.integrate(delta));
    }

    /// Fill the contact buffer and return how many contacts were written.
    pub fn generate_contacts(&mut self) -> usize {
        let limit = self.contacts.len();
        self.contact_count = self.contact_generators.add_contact(&self.particles, &mut self.contacts, limit);
        if limit > 0 && self.contact_count == limit {
            log::trace!("contact buffer full at {} contacts; later generators were truncated", limit);
        }
        self.contact_count
    }

    /// Integrate, then generate and resolve contacts.
    pub fn run_physics<O: StepObserver>(&mut self, delta: F, observer: &mut O) {
        self.integrate(delta);
        observer.on_integrate();

        let used = self.generate_contacts();
        observer.on_contacts_generated(used);

        if used > 0 {
            if self.adaptive_iterations {
                self.resolver.set_iterations(used * 2);
            }
            self.resolver
                .resolve_contacts(&mut self.contacts[..used], &mut self.particles, delta, observer);
        }
    }

    /// Advance the simulation by `delta` seconds.
    pub fn step(&mut self, delta: F) {
        self.step_observed(delta, &mut NoOpStepObserver);
    }

    pub fn step_observed<O: StepObserver>(&mut self, delta: F, observer: &mut O) {
        self.start_frame();
        observer.on_start_frame();

        self.apply_forces(delta);
        observer.on_forces_applied();

        self.run_physics(delta, observer);

        log::trace!(
            "step: {} particles, {} contacts, {} resolver iterations",
            self.particles.len(),
            self.contact_count,
            if self.contact_count > 0 { self.resolver.iterations_used() } else { 0 }
        );
        observer.on_step_complete();
    }
}
