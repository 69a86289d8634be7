use tether::{
    ContactGenerator, ContactGeneratorId, Particle, PhysicsError, Rod, Terrain, Vector3, Vehicle, VehicleConfig,
    World,
};

const DT: f64 = 1.0 / 60.0;

fn ground(world: &mut World<f64>) -> ContactGeneratorId {
    let vertices = (-50..=200).map(|x| Vector3::new2(x as f64, 0.0)).collect();
    world.contact_registry_mut().add(Terrain::new(vertices).unwrap())
}

fn spawn_on_ground() -> (World<f64>, Vehicle<f64>, ContactGeneratorId) {
    let mut world = World::new(256, 0);
    let terrain = ground(&mut world);
    let mut vehicle = Vehicle::spawn(&mut world, Vector3::new2(0.5, 1.3), VehicleConfig::new()).unwrap();
    vehicle.attach_to_terrain(&mut world, terrain).unwrap();
    (world, vehicle, terrain)
}

fn drive(world: &mut World<f64>, vehicle: &Vehicle<f64>, steps: usize) {
    for _ in 0..steps {
        vehicle.update_drive(world);
        world.step(DT);
    }
}

#[test]
fn spawn_registers_the_whole_rig() {
    let mut world: World<f64> = World::new(64, 0);
    let vehicle = Vehicle::spawn(&mut world, Vector3::zero(), VehicleConfig::new()).unwrap();

    assert_eq!(world.particles().len(), 6);
    assert_eq!(world.contact_registry().len(), tether::vehicle::FRAME_LINKS);
    assert_eq!(world.force_registry().len(), tether::vehicle::FORCE_REGISTRATIONS);
    assert_eq!(vehicle.cross_frame(), &vehicle.links()[4..6]);

    for &id in vehicle.frame().iter().chain(vehicle.wheels()) {
        assert!(world.particles().contains(id));
    }
    let gravity = vehicle.force_registrations()[0].1;
    assert!(vehicle.force_registrations()[..6].iter().all(|&(_, g)| g == gravity));
}

#[test]
fn cross_frame_rods_span_the_diagonals() {
    let mut world: World<f64> = World::new(64, 0);
    let config = VehicleConfig::new();
    let vehicle = Vehicle::spawn(&mut world, Vector3::zero(), config).unwrap();
    let diagonal = (config.wheelbase * config.wheelbase + config.body_height * config.body_height).sqrt();

    for &link in vehicle.cross_frame() {
        match world.contact_registry().get(link) {
            Some(ContactGenerator::Rod(rod)) => {
                assert!((rod.length - diagonal).abs() < 1e-12);
                let current = rod.current_length(world.particles()).unwrap();
                assert!((current - diagonal).abs() < 1e-12);
            }
            other => panic!("cross frame link is {:?}", other),
        }
    }
}

#[test]
fn rejects_bad_config() {
    let mut world: World<f64> = World::new(64, 0);
    let config = VehicleConfig { ride_height: 0.2, ..VehicleConfig::new() };
    assert!(matches!(
        Vehicle::spawn(&mut world, Vector3::zero(), config),
        Err(PhysicsError::InvalidConfig(_))
    ));
    let config = VehicleConfig { wheel_mass: 0.0, ..VehicleConfig::new() };
    assert!(matches!(Vehicle::spawn(&mut world, Vector3::zero(), config), Err(PhysicsError::InvalidMass)));
    assert!(world.particles().is_empty());
}

#[test]
fn settles_on_flat_ground() {
    let (mut world, vehicle, _) = spawn_on_ground();
    let spawned = vehicle.position(&world).unwrap();

    let mut grounded_frames = 0;
    for i in 0..300 {
        world.step(DT);
        if i >= 270 && (vehicle.wheel_grounded(&world, 0) || vehicle.wheel_grounded(&world, 1)) {
            grounded_frames += 1;
        }
    }

    assert!(grounded_frames > 0, "wheels never touched the ground");
    let centre = vehicle.position(&world).unwrap();
    assert!(centre.y > 0.8 && centre.y < 3.0, "chassis centre at {:?}", centre);
    assert!((centre.x - spawned.x).abs() < 1.0, "vehicle drifted to {:?}", centre);
    for &wheel in vehicle.wheels() {
        let y = world.particle(wheel).unwrap().position.y;
        assert!(y > 0.3, "wheel sank to {}", y);
    }

    let config = *vehicle.config();
    let frame = vehicle.frame();
    let bottom = world.particle(frame[0]).unwrap().position.distance(world.particle(frame[1]).unwrap().position);
    assert!((bottom - config.wheelbase).abs() < 0.05, "chassis stretched to {}", bottom);
}

#[test]
fn throttle_drives_forward_and_back() {
    let (mut world, mut vehicle, _) = spawn_on_ground();
    drive(&mut world, &vehicle, 60);
    let start = vehicle.position(&world).unwrap().x;

    vehicle.set_throttle(1.0);
    drive(&mut world, &vehicle, 180);
    let forward = vehicle.position(&world).unwrap().x;
    assert!(forward - start > 1.0, "moved from {} to {}", start, forward);

    let (mut world, mut vehicle, _) = spawn_on_ground();
    drive(&mut world, &vehicle, 60);
    vehicle.set_throttle(-1.0);
    drive(&mut world, &vehicle, 180);
    assert!(vehicle.position(&world).unwrap().x < start - 1.0);
}

#[test]
fn throttle_is_clamped() {
    let mut world: World<f64> = World::new(64, 0);
    let mut vehicle = Vehicle::spawn(&mut world, Vector3::zero(), VehicleConfig::new()).unwrap();
    vehicle.set_throttle(3.0);
    assert_eq!(vehicle.throttle(), 1.0);
    vehicle.set_throttle(-7.5);
    assert_eq!(vehicle.throttle(), -1.0);
}

#[test]
fn airborne_wheels_get_no_drive() {
    let mut world: World<f64> = World::new(64, 0);
    let terrain = ground(&mut world);
    let mut vehicle = Vehicle::spawn(&mut world, Vector3::new2(0.5, 20.0), VehicleConfig::new()).unwrap();
    vehicle.attach_to_terrain(&mut world, terrain).unwrap();
    vehicle.set_throttle(1.0);

    drive(&mut world, &vehicle, 10);
    assert!(!vehicle.wheel_grounded(&world, 0));
    let centre = vehicle.position(&world).unwrap();
    assert!((centre.x - 2.0).abs() < 1e-6, "airborne vehicle moved sideways to {}", centre.x);
}

#[test]
fn attach_fails_without_a_free_probe_slot() {
    let mut world: World<f64> = World::new(64, 0);
    let terrain = ground(&mut world);
    let blocker = world.add_particle(Particle::new(Vector3::new2(10.0, 5.0)));
    if let Some(ContactGenerator::Terrain(t)) = world.contact_registry_mut().get_mut(terrain) {
        t.add_probe(blocker, 0.5).unwrap();
    }

    let mut vehicle = Vehicle::spawn(&mut world, Vector3::new2(0.0, 1.3), VehicleConfig::new()).unwrap();
    assert!(matches!(
        vehicle.attach_to_terrain(&mut world, terrain),
        Err(PhysicsError::TooManyProbes { .. })
    ));
    match world.contact_registry().get(terrain) {
        Some(ContactGenerator::Terrain(t)) => assert_eq!(t.probes().len(), 1),
        _ => panic!("terrain missing"),
    }

    let rod = world.contact_registry_mut().add(Rod::joint(blocker, vehicle.frame()[0]));
    assert!(matches!(vehicle.attach_to_terrain(&mut world, rod), Err(PhysicsError::InvalidConfig(_))));
}

#[test]
fn despawn_unregisters_everything() {
    let (mut world, vehicle, terrain) = spawn_on_ground();
    drive(&mut world, &vehicle, 30);

    let particles = vehicle.despawn(&mut world);
    assert_eq!(particles.len(), 6);
    assert!(world.particles().is_empty());
    assert!(world.force_registry().is_empty());
    assert_eq!(world.contact_registry().len(), 1);
    match world.contact_registry().get(terrain) {
        Some(ContactGenerator::Terrain(t)) => assert!(t.probes().is_empty()),
        _ => panic!("terrain missing"),
    }

    world.step(DT);
    assert!(world.contacts().is_empty());
}

#[test]
fn respawning_does_not_grow_the_force_registry() {
    let mut world: World<f64> = World::new(64, 0);
    let vehicle = Vehicle::spawn(&mut world, Vector3::zero(), VehicleConfig::new()).unwrap();
    let capacity = world.force_registry().capacity();
    vehicle.despawn(&mut world);

    for _ in 0..5 {
        let vehicle = Vehicle::spawn(&mut world, Vector3::zero(), VehicleConfig::new()).unwrap();
        assert_eq!(world.force_registry().len(), tether::vehicle::FORCE_REGISTRATIONS);
        vehicle.despawn(&mut world);
    }
    assert_eq!(world.force_registry().capacity(), capacity);
}
