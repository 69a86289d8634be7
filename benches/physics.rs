//! Benchmarks for tether particle simulation.

use criterion::{criterion_group, criterion_main, Criterion};
use tether::*;

fn bench_rod_chain(c: &mut Criterion) {
    c.bench_function("rod_chain_50_links_60_steps", |b| {
        b.iter(|| {
            let mut world: World<f32> = World::new(128, 0);
            let gravity = world.force_registry_mut().add_generator(Gravity::new(Vector3::new2(0.0, -9.81)));
            let anchor = world.add_particle(Particle::immovable(Vector3::new2(0.0, 10.0)));
            let mut previous = anchor;
            for i in 0..50 {
                let id = world.add_particle(Particle::new(Vector3::new2((i + 1) as f32 * 0.5, 10.0)));
                world.force_registry_mut().add(id, gravity);
                world.contact_registry_mut().add(Rod::new(previous, id, 0.5));
                previous = id;
            }
            for _ in 0..60 {
                world.step(1.0 / 60.0);
            }
            world.particle(previous).map(|p| p.position)
        });
    });
}

fn bench_panel_rain(c: &mut Criterion) {
    c.bench_function("panel_batch_200_particles_60_steps", |b| {
        b.iter(|| {
            let mut world: World<f32> = World::new(256, 0);
            let gravity = world.force_registry_mut().add_generator(Gravity::new(Vector3::new2(0.0, -9.81)));
            let mut floor = PanelBatch::new(Vector3::zero(), Vector3::new2(0.0, 1.0), 0.4);
            for i in 0..200 {
                let id = world.add_particle(Particle::new(Vector3::new2(i as f32 * 0.1, 1.0 + (i % 7) as f32 * 0.2)));
                world.force_registry_mut().add(id, gravity);
                floor.push(id);
            }
            world.contact_registry_mut().add(floor);
            for _ in 0..60 {
                world.step(1.0 / 60.0);
            }
            world.contacts().len()
        });
    });
}

fn bench_vehicle_on_terrain(c: &mut Criterion) {
    let ground: Vec<Vector3<f32>> = (0..10_000)
        .map(|x| Vector3::new2(x as f32 - 100.0, 0.25 * (x as f32 * 0.3).sin()))
        .collect();

    c.bench_function("vehicle_10k_vertex_terrain_120_steps", |b| {
        b.iter(|| {
            let mut world: World<f32> = World::new(256, 0);
            let terrain = world.contact_registry_mut().add(Terrain::new(ground.clone()).unwrap());
            let mut vehicle = Vehicle::spawn(&mut world, Vector3::new2(0.5, 1.6), VehicleConfig::new()).unwrap();
            vehicle.attach_to_terrain(&mut world, terrain).unwrap();
            vehicle.set_throttle(1.0);
            for _ in 0..120 {
                vehicle.update_drive(&mut world);
                world.step(1.0 / 60.0);
            }
            vehicle.position(&world)
        });
    });
}

criterion_group!(benches, bench_rod_chain, bench_panel_rain, bench_vehicle_on_terrain);
criterion_main!(benches);
