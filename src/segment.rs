//! Point-versus-segment proximity, shared by [`Segment`] and the terrain.

use crate::contact::ParticleContact;
use crate::float::{Float, Real};
use crate::particle::{ParticleId, ParticleSet};
use crate::vector::Vector3;

/// Which part of a segment a point is nearest to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SegmentRegion {
    Start,
    End,
    Interior,
}

/// Result of a point-versus-segment test that found an overlap.
#[derive(Copy, Clone, Debug)]
pub struct SegmentHit<F: Float = Real> {
    pub region: SegmentRegion,
    pub normal: Vector3<F>,
    pub penetration: F,
}

/// Test a disc of `radius` centred at `point` against the segment
/// `start..end` in the XY plane.
///
/// Endpoint caps are round. The interior is one-sided: its solid side lies
/// to the right of `start -> end`, so a left-to-right run of vertices is
/// ground with its surface normal pointing up, and a point anywhere below
/// the line within the interior span is pushed back out. Touching at
/// exactly `radius` counts as a zero-depth hit.
pub fn test_segment<F: Float>(
    start: Vector3<F>,
    end: Vector3<F>,
    point: Vector3<F>,
    radius: F,
) -> Option<SegmentHit<F>> {
    let direction = end - start;
    let length_sq = direction.square_magnitude();
    let relative = point - start;
    let surface_normal = -direction.normalize().perp();

    let t = if length_sq.is_near_zero(F::epsilon()) {
        F::zero()
    } else {
        relative.dot(direction) / length_sq
    };

    if t <= F::zero() {
        return cap_hit(SegmentRegion::Start, start, point, radius, surface_normal);
    }
    if t >= F::one() {
        return cap_hit(SegmentRegion::End, end, point, radius, surface_normal);
    }

    let offset = relative.dot(surface_normal);
    if offset > radius {
        return None;
    }
    Some(SegmentHit {
        region: SegmentRegion::Interior,
        normal: surface_normal,
        penetration: radius - offset,
    })
}

fn cap_hit<F: Float>(
    region: SegmentRegion,
    cap: Vector3<F>,
    point: Vector3<F>,
    radius: F,
    fallback_normal: Vector3<F>,
) -> Option<SegmentHit<F>> {
    let offset = point - cap;
    let distance = offset.magnitude();
    if distance > radius {
        return None;
    }
    let normal = if distance.is_near_zero(F::epsilon()) {
        fallback_normal
    } else {
        offset.scale(F::one() / distance)
    };
    Some(SegmentHit { region, normal, penetration: radius - distance })
}

/// A single solid segment colliding with one particle of the given radius.
#[derive(Copy, Clone, Debug)]
pub struct Segment<F: Float = Real> {
    pub particle: ParticleId,
    pub start: Vector3<F>,
    pub end: Vector3<F>,
    pub radius: F,
    pub restitution: F,
}

impl<F: Float> Segment<F> {
    pub fn new(particle: ParticleId, start: Vector3<F>, end: Vector3<F>, radius: F, restitution: F) -> Self {
        Segment { particle, start, end, radius, restitution }
    }

    pub fn contact(&self, particles: &ParticleSet<F>) -> Option<ParticleContact<F>> {
        let position = particles.get(self.particle)?.position;
        let hit = test_segment(self.start, self.end, position, self.radius)?;
        Some(ParticleContact::new(self.particle, None, hit.normal, hit.penetration, self.restitution))
    }
}
