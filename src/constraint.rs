//! Link generators: rods, cables, half-rods and panels.
//!
//! Each link inspects the particles it constrains and, when the constraint
//! is violated, writes a [`ParticleContact`] for the resolver. Nothing is
//! moved here.

use crate::contact::ParticleContact;
use crate::error::PhysicsError;
use crate::float::{Float, Real};
use crate::particle::{ParticleId, ParticleSet};
use crate::segment::Segment;
use crate::terrain::Terrain;
use crate::vector::Vector3;
use alloc::vec::Vec;

/// A contact source that can be registered with the world.
#[derive(Clone, Debug)]
pub enum ContactGenerator<F: Float = Real> {
    Rod(Rod<F>),
    AnchoredRod(AnchoredRod<F>),
    Cable(Cable<F>),
    AnchoredCable(AnchoredCable<F>),
    HalfRod(HalfRod<F>),
    AnchoredHalfRod(AnchoredHalfRod<F>),
    Panel(Panel<F>),
    PanelBatch(PanelBatch<F>),
    Segment(Segment<F>),
    Terrain(Terrain<F>),
}

impl<F: Float> ContactGenerator<F> {
    /// Write up to `limit` contacts into `contacts` and return how many
    /// were written. `contacts` must hold at least `limit` entries; any
    /// shortfall further caps the output.
    ///
    /// Terrain runs even with no room left so its probes' ground state
    /// reflects this step.
    pub fn add_contact(
        &mut self,
        particles: &ParticleSet<F>,
        contacts: &mut [ParticleContact<F>],
        limit: usize,
    ) -> usize {
        let limit = limit.min(contacts.len());
        if let ContactGenerator::Terrain(c) = self {
            return c.add_contact(particles, contacts, limit);
        }
        if limit == 0 {
            return 0;
        }
        let single = match self {
            ContactGenerator::Rod(c) => c.contact(particles),
            ContactGenerator::AnchoredRod(c) => c.contact(particles),
            ContactGenerator::Cable(c) => c.contact(particles),
            ContactGenerator::AnchoredCable(c) => c.contact(particles),
            ContactGenerator::HalfRod(c) => c.contact(particles),
            ContactGenerator::AnchoredHalfRod(c) => c.contact(particles),
            ContactGenerator::Panel(c) => c.contact(particles),
            ContactGenerator::Segment(c) => c.contact(particles),
            ContactGenerator::PanelBatch(c) => return c.add_contact(particles, contacts, limit),
            ContactGenerator::Terrain(_) => None,
        };
        match single {
            Some(contact) => {
                contacts[0] = contact;
                1
            }
            None => 0,
        }
    }

    /// Forget `id`. Returns true when the generator can no longer act and
    /// should be dropped; batches and terrain just stop tracking it.
    pub fn release(&mut self, id: ParticleId) -> bool {
        match self {
            ContactGenerator::PanelBatch(c) => {
                c.remove(id);
                false
            }
            ContactGenerator::Terrain(c) => {
                c.remove_probe(id);
                false
            }
            other => other.references(id),
        }
    }

    /// Restitution of the contacts this generator writes. Rods always
    /// write zero.
    pub fn restitution(&self) -> F {
        match self {
            ContactGenerator::Rod(_) | ContactGenerator::AnchoredRod(_) => F::zero(),
            ContactGenerator::Cable(c) => c.restitution,
            ContactGenerator::AnchoredCable(c) => c.restitution,
            ContactGenerator::HalfRod(c) => c.restitution,
            ContactGenerator::AnchoredHalfRod(c) => c.restitution,
            ContactGenerator::Panel(c) => c.restitution,
            ContactGenerator::PanelBatch(c) => c.restitution,
            ContactGenerator::Segment(c) => c.restitution,
            ContactGenerator::Terrain(c) => c.restitution,
        }
    }

    /// Check parameters that would make resolution misbehave.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let restitution = self.restitution();
        if !(restitution >= F::zero()) || restitution > F::one() {
            return Err(PhysicsError::InvalidRestitution);
        }
        Ok(())
    }

    /// True when this generator acts on `id`.
    pub fn references(&self, id: ParticleId) -> bool {
        match self {
            ContactGenerator::Rod(c) => c.particles.contains(&id),
            ContactGenerator::AnchoredRod(c) => c.particle == id,
            ContactGenerator::Cable(c) => c.particles.contains(&id),
            ContactGenerator::AnchoredCable(c) => c.particle == id,
            ContactGenerator::HalfRod(c) => c.particles.contains(&id),
            ContactGenerator::AnchoredHalfRod(c) => c.particle == id,
            ContactGenerator::Panel(c) => c.particle == id,
            ContactGenerator::PanelBatch(c) => c.particles.contains(&id),
            ContactGenerator::Segment(c) => c.particle == id,
            ContactGenerator::Terrain(c) => c.probes().iter().any(|p| p.particle == id),
        }
    }
}

/// Offset from `a` to `b` and its length, if both are live.
fn pair<F: Float>(particles: &ParticleSet<F>, ids: [ParticleId; 2]) -> Option<(Vector3<F>, F)> {
    let a = particles.get(ids[0])?.position;
    let b = particles.get(ids[1])?.position;
    let offset = b - a;
    Some((offset, offset.magnitude()))
}

fn anchored<F: Float>(particles: &ParticleSet<F>, id: ParticleId, anchor: Vector3<F>) -> Option<(Vector3<F>, F)> {
    let offset = anchor - particles.get(id)?.position;
    Some((offset, offset.magnitude()))
}

/// Contact holding `current` at exactly `length`; restitution zero.
fn rod_contact<F: Float>(
    particle: ParticleId,
    other: Option<ParticleId>,
    offset: Vector3<F>,
    current: F,
    length: F,
) -> Option<ParticleContact<F>> {
    if current == length {
        return None;
    }
    let normal = offset.normalize();
    let contact = if current > length {
        ParticleContact::new(particle, other, normal, current - length, F::zero())
    } else {
        ParticleContact::new(particle, other, -normal, length - current, F::zero())
    };
    Some(contact)
}

fn cable_contact<F: Float>(
    particle: ParticleId,
    other: Option<ParticleId>,
    offset: Vector3<F>,
    current: F,
    max_length: F,
    restitution: F,
) -> Option<ParticleContact<F>> {
    if current < max_length {
        return None;
    }
    Some(ParticleContact::new(particle, other, offset.normalize(), current - max_length, restitution))
}

fn half_rod_contact<F: Float>(
    particle: ParticleId,
    other: Option<ParticleId>,
    offset: Vector3<F>,
    current: F,
    min_length: F,
    restitution: F,
) -> Option<ParticleContact<F>> {
    if current > min_length {
        return None;
    }
    Some(ParticleContact::new(particle, other, -offset.normalize(), min_length - current, restitution))
}

/// Holds two particles at a fixed distance.
#[derive(Copy, Clone, Debug)]
pub struct Rod<F: Float = Real> {
    pub particles: [ParticleId; 2],
    pub length: F,
}

impl<F: Float> Rod<F> {
    pub fn new(a: ParticleId, b: ParticleId, length: F) -> Self {
        Rod { particles: [a, b], length }
    }

    /// Rod whose length is the current distance between `a` and `b`.
    pub fn between(a: ParticleId, b: ParticleId, particles: &ParticleSet<F>) -> Option<Self> {
        let (_, length) = pair(particles, [a, b])?;
        Some(Rod::new(a, b, length))
    }

    /// Zero-length rod pinning two particles together.
    pub fn joint(a: ParticleId, b: ParticleId) -> Self {
        Rod::new(a, b, F::zero())
    }

    pub fn current_length(&self, particles: &ParticleSet<F>) -> Option<F> {
        pair(particles, self.particles).map(|(_, length)| length)
    }

    pub fn contact(&self, particles: &ParticleSet<F>) -> Option<ParticleContact<F>> {
        let (offset, current) = pair(particles, self.particles)?;
        rod_contact(self.particles[0], Some(self.particles[1]), offset, current, self.length)
    }
}

/// Holds a particle at a fixed distance from a point.
#[derive(Copy, Clone, Debug)]
pub struct AnchoredRod<F: Float = Real> {
    pub particle: ParticleId,
    pub anchor: Vector3<F>,
    pub length: F,
}

impl<F: Float> AnchoredRod<F> {
    pub fn new(particle: ParticleId, anchor: Vector3<F>, length: F) -> Self {
        AnchoredRod { particle, anchor, length }
    }

    pub fn contact(&self, particles: &ParticleSet<F>) -> Option<ParticleContact<F>> {
        let (offset, current) = anchored(particles, self.particle, self.anchor)?;
        rod_contact(self.particle, None, offset, current, self.length)
    }
}

/// Stops two particles separating beyond `max_length`.
#[derive(Copy, Clone, Debug)]
pub struct Cable<F: Float = Real> {
    pub particles: [ParticleId; 2],
    pub max_length: F,
    pub restitution: F,
}

impl<F: Float> Cable<F> {
    pub fn new(a: ParticleId, b: ParticleId, max_length: F, restitution: F) -> Self {
        Cable { particles: [a, b], max_length, restitution }
    }

    pub fn contact(&self, particles: &ParticleSet<F>) -> Option<ParticleContact<F>> {
        let (offset, current) = pair(particles, self.particles)?;
        cable_contact(self.particles[0], Some(self.particles[1]), offset, current, self.max_length, self.restitution)
    }
}

/// Stops a particle moving further than `max_length` from a point.
#[derive(Copy, Clone, Debug)]
pub struct AnchoredCable<F: Float = Real> {
    pub particle: ParticleId,
    pub anchor: Vector3<F>,
    pub max_length: F,
    pub restitution: F,
}

impl<F: Float> AnchoredCable<F> {
    pub fn new(particle: ParticleId, anchor: Vector3<F>, max_length: F, restitution: F) -> Self {
        AnchoredCable { particle, anchor, max_length, restitution }
    }

    pub fn contact(&self, particles: &ParticleSet<F>) -> Option<ParticleContact<F>> {
        let (offset, current) = anchored(particles, self.particle, self.anchor)?;
        cable_contact(self.particle, None, offset, current, self.max_length, self.restitution)
    }
}

/// Stops two particles closing below `min_length`.
#[derive(Copy, Clone, Debug)]
pub struct HalfRod<F: Float = Real> {
    pub particles: [ParticleId; 2],
    pub min_length: F,
    pub restitution: F,
}

impl<F: Float> HalfRod<F> {
    pub fn new(a: ParticleId, b: ParticleId, min_length: F) -> Self {
        HalfRod { particles: [a, b], min_length, restitution: F::zero() }
    }

    pub fn with_restitution(mut self, restitution: F) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn contact(&self, particles: &ParticleSet<F>) -> Option<ParticleContact<F>> {
        let (offset, current) = pair(particles, self.particles)?;
        half_rod_contact(self.particles[0], Some(self.particles[1]), offset, current, self.min_length, self.restitution)
    }
}

/// Stops a particle approaching closer than `min_length` to a point.
#[derive(Copy, Clone, Debug)]
pub struct AnchoredHalfRod<F: Float = Real> {
    pub particle: ParticleId,
    pub anchor: Vector3<F>,
    pub min_length: F,
    pub restitution: F,
}

impl<F: Float> AnchoredHalfRod<F> {
    pub fn new(particle: ParticleId, anchor: Vector3<F>, min_length: F) -> Self {
        AnchoredHalfRod { particle, anchor, min_length, restitution: F::zero() }
    }

    pub fn with_restitution(mut self, restitution: F) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn contact(&self, particles: &ParticleSet<F>) -> Option<ParticleContact<F>> {
        let (offset, current) = anchored(particles, self.particle, self.anchor)?;
        half_rod_contact(self.particle, None, offset, current, self.min_length, self.restitution)
    }
}

/// Infinite plane through `anchor`; particles must stay on the side
/// `normal` points to. A particle lying exactly on the plane yields a
/// zero-depth contact so resting bodies keep their velocity clamped.
#[derive(Copy, Clone, Debug)]
pub struct Panel<F: Float = Real> {
    pub particle: ParticleId,
    pub anchor: Vector3<F>,
    pub normal: Vector3<F>,
    pub restitution: F,
}

impl<F: Float> Panel<F> {
    pub fn new(particle: ParticleId, anchor: Vector3<F>, normal: Vector3<F>, restitution: F) -> Self {
        Panel { particle, anchor, normal: normal.normalize(), restitution }
    }

    pub fn contact(&self, particles: &ParticleSet<F>) -> Option<ParticleContact<F>> {
        let position = particles.get(self.particle)?.position;
        panel_contact(self.particle, position, self.anchor, self.normal, self.restitution)
    }
}

fn panel_contact<F: Float>(
    particle: ParticleId,
    position: Vector3<F>,
    anchor: Vector3<F>,
    normal: Vector3<F>,
    restitution: F,
) -> Option<ParticleContact<F>> {
    let distance = (position - anchor).dot(normal);
    if distance > F::zero() {
        return None;
    }
    Some(ParticleContact::new(particle, None, normal, -distance, restitution))
}

/// One plane shared by many particles.
#[derive(Clone, Debug)]
pub struct PanelBatch<F: Float = Real> {
    pub particles: Vec<ParticleId>,
    pub anchor: Vector3<F>,
    pub normal: Vector3<F>,
    pub restitution: F,
}

impl<F: Float> PanelBatch<F> {
    pub fn new(anchor: Vector3<F>, normal: Vector3<F>, restitution: F) -> Self {
        PanelBatch { particles: Vec::new(), anchor, normal: normal.normalize(), restitution }
    }

    pub fn with_particles(mut self, particles: impl IntoIterator<Item = ParticleId>) -> Self {
        self.particles.extend(particles);
        self
    }

    pub fn push(&mut self, particle: ParticleId) {
        self.particles.push(particle);
    }

    pub fn remove(&mut self, particle: ParticleId) {
        self.particles.retain(|&p| p != particle);
    }

    pub fn add_contact(
        &self,
        particles: &ParticleSet<F>,
        contacts: &mut [ParticleContact<F>],
        limit: usize,
    ) -> usize {
        let limit = limit.min(contacts.len());
        let mut used = 0;
        for &id in &self.particles {
            if used >= limit {
                break;
            }
            let Some(p) = particles.get(id) else { continue };
            if let Some(contact) = panel_contact(id, p.position, self.anchor, self.normal, self.restitution) {
                contacts[used] = contact;
                used += 1;
            }
        }
        used
    }
}

impl<F: Float> From<Rod<F>> for ContactGenerator<F> {
    fn from(c: Rod<F>) -> Self { ContactGenerator::Rod(c) }
}

impl<F: Float> From<AnchoredRod<F>> for ContactGenerator<F> {
    fn from(c: AnchoredRod<F>) -> Self { ContactGenerator::AnchoredRod(c) }
}

impl<F: Float> From<Cable<F>> for ContactGenerator<F> {
    fn from(c: Cable<F>) -> Self { ContactGenerator::Cable(c) }
}

impl<F: Float> From<AnchoredCable<F>> for ContactGenerator<F> {
    fn from(c: AnchoredCable<F>) -> Self { ContactGenerator::AnchoredCable(c) }
}

impl<F: Float> From<HalfRod<F>> for ContactGenerator<F> {
    fn from(c: HalfRod<F>) -> Self { ContactGenerator::HalfRod(c) }
}

impl<F: Float> From<AnchoredHalfRod<F>> for ContactGenerator<F> {
    fn from(c: AnchoredHalfRod<F>) -> Self { ContactGenerator::AnchoredHalfRod(c) }
}

impl<F: Float> From<Panel<F>> for ContactGenerator<F> {
    fn from(c: Panel<F>) -> Self { ContactGenerator::Panel(c) }
}

impl<F: Float> From<PanelBatch<F>> for ContactGenerator<F> {
    fn from(c: PanelBatch<F>) -> Self { ContactGenerator::PanelBatch(c) }
}

impl<F: Float> From<Segment<F>> for ContactGenerator<F> {
    fn from(c: Segment<F>) -> Self { ContactGenerator::Segment(c) }
}

impl<F: Float> From<Terrain<F>> for ContactGenerator<F> {
    fn from(c: Terrain<F>) -> Self { ContactGenerator::Terrain(c) }
}
