//! Registries that hold the world's force and contact generators.

use crate::constraint::ContactGenerator;
use crate::contact::ParticleContact;
use crate::error::PhysicsError;
use crate::float::{Float, Real};
use crate::force::ForceGenerator;
use crate::particle::{ParticleId, ParticleSet};
use alloc::vec::Vec;

/// Handle to a generator stored in a [`ForceRegistry`].
///
/// Slots freed by [`ForceRegistry::remove_generator`] are reused with a
/// bumped generation, so a stale handle never reaches a newer generator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ForceGeneratorId {
    index: usize,
    generation: u32,
}

struct GeneratorSlot<F: Float> {
    generation: u32,
    generator: Option<ForceGenerator<F>>,
}

/// Pairs of (particle, generator), applied in insertion order.
///
/// A generator is stored once and may be registered against any number of
/// particles.
pub struct ForceRegistry<F: Float = Real> {
    generators: Vec<GeneratorSlot<F>>,
    free: Vec<usize>,
    registrations: Vec<(ParticleId, ForceGeneratorId)>,
}

impl<F: Float> ForceRegistry<F> {
    pub fn new() -> Self {
        ForceRegistry { generators: Vec::new(), free: Vec::new(), registrations: Vec::new() }
    }

    pub fn add_generator(&mut self, generator: impl Into<ForceGenerator<F>>) -> ForceGeneratorId {
        let generator = Some(generator.into());
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.generators[index];
                slot.generator = generator;
                ForceGeneratorId { index, generation: slot.generation }
            }
            None => {
                self.generators.push(GeneratorSlot { generation: 0, generator });
                ForceGeneratorId { index: self.generators.len() - 1, generation: 0 }
            }
        }
    }

    /// Drop a generator and every registration that uses it.
    pub fn remove_generator(&mut self, id: ForceGeneratorId) -> Option<ForceGenerator<F>> {
        let slot = self.generators.get_mut(id.index).filter(|slot| slot.generation == id.generation)?;
        let generator = slot.generator.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.registrations.retain(|&(_, g)| g != id);
        Some(generator)
    }

    pub fn generator(&self, id: ForceGeneratorId) -> Option<&ForceGenerator<F>> {
        self.generators
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.generator.as_ref())
    }

    pub fn generator_mut(&mut self, id: ForceGeneratorId) -> Option<&mut ForceGenerator<F>> {
        self.generators
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.generator.as_mut())
    }

    /// Slots allocated for generators, live or free.
    pub fn capacity(&self) -> usize { self.generators.len() }

    /// Register `generator` to act on `particle` every step.
    pub fn add(&mut self, particle: ParticleId, generator: ForceGeneratorId) {
        self.registrations.push((particle, generator));
    }

    /// Remove one registration of the pair, if present.
    pub fn remove(&mut self, particle: ParticleId, generator: ForceGeneratorId) -> bool {
        match self.registrations.iter().position(|&r| r == (particle, generator)) {
            Some(index) => {
                self.registrations.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every registration that acts on `particle`.
    pub fn remove_particle(&mut self, particle: ParticleId) {
        self.registrations.retain(|&(p, _)| p != particle);
    }

    /// Remove all registrations and generators.
    pub fn clear(&mut self) {
        self.registrations.clear();
        for (index, slot) in self.generators.iter_mut().enumerate() {
            if slot.generator.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index);
            }
        }
    }

    /// Number of registrations.
    pub fn len(&self) -> usize { self.registrations.len() }

    pub fn is_empty(&self) -> bool { self.registrations.is_empty() }

    pub fn registrations(&self) -> &[(ParticleId, ForceGeneratorId)] { &self.registrations }

    /// Apply every registered force once.
    pub fn update_forces(&self, particles: &mut ParticleSet<F>, delta: F) {
        for &(particle, generator) in &self.registrations {
            if let Some(generator) = self.generator(generator) {
                generator.update_force(particle, particles, delta);
            }
        }
    }
}

impl<F: Float> Default for ForceRegistry<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a generator stored in a [`ContactRegistry`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContactGeneratorId(usize);

/// Ordered list of contact generators.
///
/// Registration order decides which generators get buffer space first when
/// the buffer is short; it has no effect on resolution order.
pub struct ContactRegistry<F: Float = Real> {
    generators: Vec<(ContactGeneratorId, ContactGenerator<F>)>,
    next_id: usize,
}

impl<F: Float> ContactRegistry<F> {
    pub fn new() -> Self {
        ContactRegistry { generators: Vec::new(), next_id: 0 }
    }

    pub fn add(&mut self, generator: impl Into<ContactGenerator<F>>) -> ContactGeneratorId {
        let id = ContactGeneratorId(self.next_id);
        self.next_id += 1;
        self.generators.push((id, generator.into()));
        id
    }

    /// Like [`ContactRegistry::add`], but rejects a generator whose
    /// restitution lies outside [0, 1].
    pub fn try_add(&mut self, generator: impl Into<ContactGenerator<F>>) -> Result<ContactGeneratorId, PhysicsError> {
        let generator = generator.into();
        generator.validate()?;
        Ok(self.add(generator))
    }

    /// Remove a generator, keeping the order of the rest.
    pub fn remove(&mut self, id: ContactGeneratorId) -> Option<ContactGenerator<F>> {
        let index = self.generators.iter().position(|(g, _)| *g == id)?;
        Some(self.generators.remove(index).1)
    }

    pub fn get(&self, id: ContactGeneratorId) -> Option<&ContactGenerator<F>> {
        self.generators.iter().find(|(g, _)| *g == id).map(|(_, c)| c)
    }

    pub fn get_mut(&mut self, id: ContactGeneratorId) -> Option<&mut ContactGenerator<F>> {
        self.generators.iter_mut().find(|(g, _)| *g == id).map(|(_, c)| c)
    }

    /// Detach `particle` from every generator, dropping generators that
    /// cannot act without it.
    pub fn remove_particle(&mut self, particle: ParticleId) {
        self.generators.retain_mut(|(_, c)| !c.release(particle));
    }

    pub fn clear(&mut self) {
        self.generators.clear();
    }

    pub fn len(&self) -> usize { self.generators.len() }

    pub fn is_empty(&self) -> bool { self.generators.is_empty() }

    /// Let each generator in turn fill the remaining buffer space, up to
    /// `limit` contacts. Returns the count written.
    ///
    /// Every generator is visited even once the buffer is full; those
    /// with nowhere to write only refresh their own state.
    pub fn add_contact(
        &mut self,
        particles: &ParticleSet<F>,
        contacts: &mut [ParticleContact<F>],
        limit: usize,
    ) -> usize {
        let limit = limit.min(contacts.len());
        let mut used = 0;
        for (_, generator) in self.generators.iter_mut() {
            used += generator.add_contact(particles, &mut contacts[used..limit], limit - used);
        }
        used
    }
}

impl<F: Float> Default for ContactRegistry<F> {
    fn default() -> Self {
        Self::new()
    }
}
