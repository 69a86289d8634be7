//! Polyline ground contact for a small number of probe particles.
//!
//! Vertices are kept sorted by X. Each step, every probe binary-searches
//! its X position and tests only a short window of neighbouring segments,
//! so the per-step cost does not grow with the length of the terrain. This
//! assumes vertices are dense compared with probe radius and per-step
//! travel.

use crate::contact::ParticleContact;
use crate::error::PhysicsError;
use crate::float::{Float, Real};
use crate::particle::{ParticleId, ParticleSet};
use crate::segment::test_segment;
use crate::vector::Vector3;
use alloc::vec::Vec;

/// Probes a single terrain can track (a vehicle's two wheels).
pub const MAX_TERRAIN_PROBES: usize = 2;

/// How many segments around the located vertex are tested.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TerrainConfig {
    /// Segments tested before the located vertex.
    pub window_before: usize,
    /// Segments tested from the located vertex onward.
    pub window_after: usize,
}

impl TerrainConfig {
    pub fn new() -> Self {
        TerrainConfig { window_before: 3, window_after: 2 }
    }

    pub fn with_window(mut self, before: usize, after: usize) -> Self {
        self.window_before = before;
        self.window_after = after;
        self
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A particle tested against the terrain, plus its ground state from the
/// last contact generation.
#[derive(Copy, Clone, Debug)]
pub struct TerrainProbe<F: Float = Real> {
    pub particle: ParticleId,
    pub radius: F,
    contact_normal: Option<Vector3<F>>,
}

impl<F: Float> TerrainProbe<F> {
    /// Normalised average of the normals of every segment touched last
    /// step, or `None` when airborne.
    pub fn contact_normal(&self) -> Option<Vector3<F>> { self.contact_normal }
}

/// Ground built from a left-to-right polyline.
#[derive(Clone, Debug)]
pub struct Terrain<F: Float = Real> {
    vertices: Vec<Vector3<F>>,
    probes: Vec<TerrainProbe<F>>,
    config: TerrainConfig,
    pub restitution: F,
    segments_tested: usize,
}

impl<F: Float> Terrain<F> {
    /// Build a terrain from vertices with strictly increasing X.
    pub fn new(vertices: Vec<Vector3<F>>) -> Result<Self, PhysicsError> {
        if vertices.len() < 2 {
            return Err(PhysicsError::DegenerateTerrain);
        }
        if let Some(index) = vertices.windows(2).position(|w| !(w[1].x > w[0].x)) {
            return Err(PhysicsError::UnsortedTerrain { index: index + 1 });
        }
        Ok(Terrain {
            vertices,
            probes: Vec::with_capacity(MAX_TERRAIN_PROBES),
            config: TerrainConfig::new(),
            restitution: F::zero(),
            segments_tested: 0,
        })
    }

    pub fn with_config(mut self, config: TerrainConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_restitution(mut self, restitution: F) -> Self {
        self.restitution = restitution;
        self
    }

    /// Track `particle` as a disc of `radius`; returns its probe index.
    pub fn add_probe(&mut self, particle: ParticleId, radius: F) -> Result<usize, PhysicsError> {
        if self.probes.len() >= MAX_TERRAIN_PROBES {
            return Err(PhysicsError::TooManyProbes { max: MAX_TERRAIN_PROBES });
        }
        self.probes.push(TerrainProbe { particle, radius, contact_normal: None });
        Ok(self.probes.len() - 1)
    }

    pub fn remove_probe(&mut self, particle: ParticleId) {
        self.probes.retain(|p| p.particle != particle);
    }

    pub fn probes(&self) -> &[TerrainProbe<F>] { &self.probes }

    pub fn vertices(&self) -> &[Vector3<F>] { &self.vertices }

    pub fn config(&self) -> TerrainConfig { self.config }

    pub fn contact_normal(&self, probe: usize) -> Option<Vector3<F>> {
        self.probes.get(probe).and_then(|p| p.contact_normal)
    }

    pub fn is_grounded(&self, probe: usize) -> bool {
        self.contact_normal(probe).is_some()
    }

    /// Segment tests performed during the last contact generation.
    pub fn segments_tested(&self) -> usize { self.segments_tested }

    /// Ground height at `x`, interpolated between vertices.
    pub fn height_at(&self, x: F) -> Option<F> {
        let index = self.vertices.partition_point(|v| v.x < x);
        if index == 0 {
            return (self.vertices[0].x == x).then(|| self.vertices[0].y);
        }
        let b = *self.vertices.get(index)?;
        let a = self.vertices[index - 1];
        let t = (x - a.x) / (b.x - a.x);
        Some(a.y + (b.y - a.y) * t)
    }

    /// Range of segment start indices tested for a probe at `x`, or `None`
    /// when `x` lies outside the covered span.
    pub fn window(&self, x: F) -> Option<core::ops::Range<usize>> {
        let index = self.vertices.partition_point(|v| v.x < x);
        if index == 0 || index >= self.vertices.len() {
            return None;
        }
        let first = index.saturating_sub(self.config.window_before);
        let last = (index + self.config.window_after).min(self.vertices.len() - 1);
        Some(first..last)
    }

    pub fn add_contact(
        &mut self,
        particles: &ParticleSet<F>,
        contacts: &mut [ParticleContact<F>],
        limit: usize,
    ) -> usize {
        let limit = limit.min(contacts.len());
        let mut used = 0;
        self.segments_tested = 0;

        for i in 0..self.probes.len() {
            self.probes[i].contact_normal = None;
            let probe = self.probes[i];
            let Some(particle) = particles.get(probe.particle) else { continue };
            let position = particle.position;
            let Some(window) = self.window(position.x) else { continue };

            let mut normal_sum = Vector3::zero();
            let mut touched = false;
            for k in window {
                self.segments_tested += 1;
                let Some(hit) = test_segment(self.vertices[k], self.vertices[k + 1], position, probe.radius) else {
                    continue;
                };
                normal_sum += hit.normal;
                touched = true;
                if used < limit {
                    contacts[used] = ParticleContact::new(probe.particle, None, hit.normal, hit.penetration, self.restitution);
                    used += 1;
                }
            }
            if touched {
                self.probes[i].contact_normal = Some(normal_sum.normalize());
            }
        }
        used
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Particle;

    fn flat(n: usize) -> Terrain<f64> {
        Terrain::new((0..n).map(|i| Vector3::new2(i as f64, 0.0)).collect()).unwrap()
    }

    #[test]
    fn rejects_unsorted_vertices() {
        let err = Terrain::new(alloc::vec![
            Vector3::new2(0.0f64, 0.0),
            Vector3::new2(2.0, 0.0),
            Vector3::new2(1.0, 0.0),
        ])
        .unwrap_err();
        assert_eq!(err, PhysicsError::UnsortedTerrain { index: 2 });
        assert_eq!(
            Terrain::new(alloc::vec![Vector3::new2(0.0f64, 0.0)]).unwrap_err(),
            PhysicsError::DegenerateTerrain
        );
    }

    #[test]
    fn limits_probe_count() {
        let mut terrain = flat(4);
        let mut set: ParticleSet<f64> = ParticleSet::new();
        for _ in 0..MAX_TERRAIN_PROBES {
            let id = set.insert(Particle::new(Vector3::zero()));
            assert!(terrain.add_probe(id, 0.5).is_ok());
        }
        let extra = set.insert(Particle::new(Vector3::zero()));
        assert_eq!(
            terrain.add_probe(extra, 0.5),
            Err(PhysicsError::TooManyProbes { max: MAX_TERRAIN_PROBES })
        );
    }

    #[test]
    fn window_clamps_at_edges() {
        let terrain = flat(10);
        assert_eq!(terrain.window(0.0), None);
        assert_eq!(terrain.window(9.5), None);
        assert_eq!(terrain.window(0.5), Some(0..3));
        assert_eq!(terrain.window(5.0), Some(2..7));
        assert_eq!(terrain.window(8.5), Some(6..9));
    }

    #[test]
    fn height_interpolates() {
        let terrain = Terrain::new(alloc::vec![Vector3::new2(0.0f64, 0.0), Vector3::new2(2.0, 1.0)]).unwrap();
        assert_eq!(terrain.height_at(1.0), Some(0.5));
        assert_eq!(terrain.height_at(0.0), Some(0.0));
        assert_eq!(terrain.height_at(3.0), None);
    }
}
