//! Iterative contact resolver.
//!
//! Each iteration picks the single most severe contact, resolves its
//! velocity and penetration, then patches the stored penetration of every
//! contact sharing a particle with it. Geometry is never re-scanned inside
//! a step, so chains of links converge over successive iterations.

use crate::contact::ParticleContact;
use crate::float::Float;
use crate::observer::StepObserver;
use crate::particle::ParticleSet;

/// Resolves a buffer of contacts within an iteration budget.
#[derive(Clone, Debug)]
pub struct ContactResolver {
    iterations: usize,
    iterations_used: usize,
}

impl ContactResolver {
    pub fn new(iterations: usize) -> Self {
        ContactResolver { iterations, iterations_used: 0 }
    }

    pub fn set_iterations(&mut self, iterations: usize) {
        self.iterations = iterations;
    }

    pub fn iterations(&self) -> usize { self.iterations }

    /// Iterations spent by the last call to `resolve_contacts`.
    pub fn iterations_used(&self) -> usize { self.iterations_used }

    /// Resolve `contacts` for a step of `delta`.
    ///
    /// Stops when nothing is closing or penetrating, or when the budget is
    /// spent; in the latter case some penetration may remain until the
    /// next step.
    pub fn resolve_contacts<F: Float, O: StepObserver>(
        &mut self,
        contacts: &mut [ParticleContact<F>],
        particles: &mut ParticleSet<F>,
        delta: F,
        observer: &mut O,
    ) {
        self.iterations_used = 0;
        while self.iterations_used < self.iterations {
            let Some(index) = most_severe(contacts, particles) else { break };

            contacts[index].resolve(particles, delta);
            propagate(contacts, index);

            observer.on_contact_resolved(self.iterations_used, index);
            self.iterations_used += 1;
        }

        if self.iterations_used == self.iterations
            && log::log_enabled!(log::Level::Trace)
            && most_severe(contacts, particles).is_some()
        {
            log::trace!(
                "resolver budget of {} iterations spent with contacts still unresolved",
                self.iterations
            );
        }
    }
}

/// Index of the contact with the lowest separating velocity among those
/// still closing or penetrating. Ties go to the earliest contact. Contacts
/// with no movable side are skipped.
pub fn most_severe<F: Float>(contacts: &[ParticleContact<F>], particles: &ParticleSet<F>) -> Option<usize> {
    let mut lowest = F::max_value();
    let mut found = None;
    for (i, contact) in contacts.iter().enumerate() {
        let separating = contact.separating_velocity(particles);
        if separating < lowest
            && (separating < F::zero() || contact.penetration > F::zero())
            && contact.total_inverse_mass(particles) > F::zero()
        {
            lowest = separating;
            found = Some(i);
        }
    }
    found
}

/// Apply the movement made by `contacts[resolved]` to the penetration of
/// every other contact sharing one of its particles.
fn propagate<F: Float>(contacts: &mut [ParticleContact<F>], resolved: usize) {
    let source = contacts[resolved];
    let moved = [(Some(source.particle), source.movement[0]), (source.other, source.movement[1])];

    for (i, contact) in contacts.iter_mut().enumerate() {
        if i == resolved {
            continue;
        }
        for &(id, movement) in &moved {
            let Some(id) = id else { continue };
            if contact.particle == id {
                contact.penetration = contact.penetration - movement.dot(contact.normal);
            }
            if contact.other == Some(id) {
                contact.penetration = contact.penetration + movement.dot(contact.normal);
            }
        }
    }
}
