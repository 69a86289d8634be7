use tether::{Panel, Particle, Rod, Vector3, World, WorldConfig};

fn drop_on_panel(restitution: f64) -> (f64, f64) {
    let mut world: World<f64> = World::new(4, 0);
    let ball = world.add_particle(
        Particle::new(Vector3::new2(0.0, 0.05)).with_velocity(Vector3::new2(0.0, -10.0)),
    );
    world
        .contact_registry_mut()
        .add(Panel::new(ball, Vector3::zero(), Vector3::new2(0.0, 1.0), restitution));
    world.step(0.01);
    let p = world.particle(ball).unwrap();
    (p.position.y, p.velocity.y)
}

#[test]
fn rebound_speed_scales_with_restitution() {
    for &r in &[0.0, 0.25, 0.5, 0.8, 1.0] {
        let (y, vy) = drop_on_panel(r);
        assert!((vy - 10.0 * r).abs() < 1e-9, "restitution {}: rebound {} expected {}", r, vy, 10.0 * r);
        assert!(y.abs() < 1e-12, "restitution {}: ball left at y = {}", r, y);
    }
}

#[test]
fn inelastic_ball_comes_to_rest_under_gravity() {
    let mut world: World<f64> = World::new(4, 0);
    let ball = world.add_particle(
        Particle::new(Vector3::new2(0.0, 1.0)).with_acceleration(Vector3::new2(0.0, -9.81)),
    );
    world
        .contact_registry_mut()
        .add(Panel::new(ball, Vector3::zero(), Vector3::new2(0.0, 1.0), 0.0));

    for _ in 0..180 {
        world.step(1.0 / 60.0);
    }

    let p = world.particle(ball).unwrap();
    assert!(p.position.y.abs() < 0.01, "ball should rest on the panel, y = {}", p.position.y);
    assert!(p.velocity.y.abs() < 0.2, "ball should not bounce, vy = {}", p.velocity.y);
}

#[test]
fn elastic_ball_keeps_bouncing() {
    let mut world: World<f64> = World::new(4, 0);
    let ball = world.add_particle(
        Particle::new(Vector3::new2(0.0, 1.0)).with_acceleration(Vector3::new2(0.0, -9.81)),
    );
    world
        .contact_registry_mut()
        .add(Panel::new(ball, Vector3::zero(), Vector3::new2(0.0, 1.0), 1.0));

    let mut peak_after_bounce: f64 = 0.0;
    let mut bounced = false;
    for _ in 0..120 {
        world.step(1.0 / 60.0);
        let p = world.particle(ball).unwrap();
        if p.velocity.y > 0.0 {
            bounced = true;
        }
        if bounced {
            peak_after_bounce = peak_after_bounce.max(p.position.y);
        }
    }
    assert!(bounced, "elastic ball never bounced");
    assert!(peak_after_bounce > 0.6, "elastic bounce lost too much height: {}", peak_after_bounce);
}

#[test]
fn immovable_side_of_a_contact_never_moves() {
    for &immovable_first in &[true, false] {
        let mut world: World<f64> = World::new(4, 8);
        let anchor = world.add_particle(Particle::immovable(Vector3::zero()));
        let free = world.add_particle(
            Particle::new(Vector3::new2(3.0, 0.0)).with_velocity(Vector3::new2(5.0, 0.0)),
        );
        let rod = if immovable_first { Rod::new(anchor, free, 2.0) } else { Rod::new(free, anchor, 2.0) };
        world.contact_registry_mut().add(rod);

        world.step(1.0 / 60.0);

        let a = world.particle(anchor).unwrap();
        assert_eq!(a.position, Vector3::zero());
        assert_eq!(a.velocity, Vector3::zero());
        let f = world.particle(free).unwrap();
        assert!((f.position.magnitude() - 2.0).abs() < 1e-9, "free end at {:?}", f.position);
        assert!(f.velocity.x.abs() < 1e-9, "rod should cancel the outward velocity, got {}", f.velocity.x);
    }
}

#[test]
fn two_immovable_particles_are_skipped() {
    let mut world: World<f64> = World::new(4, 0);
    let a = world.add_particle(Particle::immovable(Vector3::zero()));
    let b = world.add_particle(Particle::immovable(Vector3::new2(5.0, 0.0)));
    world.contact_registry_mut().add(Rod::new(a, b, 1.0));
    world.step(1.0 / 60.0);
    assert_eq!(world.particle(a).unwrap().position, Vector3::zero());
    assert_eq!(world.particle(b).unwrap().position, Vector3::new2(5.0, 0.0));
    assert_eq!(world.resolver().iterations_used(), 0);
}

#[test]
fn immovable_rod_does_not_starve_a_panel() {
    let mut world: World<f64> = World::new(8, 0);
    let a = world.add_particle(Particle::immovable(Vector3::zero()));
    let b = world.add_particle(Particle::immovable(Vector3::new2(5.0, 0.0)));
    world.contact_registry_mut().add(Rod::new(a, b, 4.0));
    let ball = world.add_particle(Particle::new(Vector3::new2(0.0, -0.5)));
    world
        .contact_registry_mut()
        .add(Panel::new(ball, Vector3::zero(), Vector3::new2(0.0, 1.0), 0.0));

    for _ in 0..10 {
        world.step(1.0 / 60.0);
    }

    let y = world.particle(ball).unwrap().position.y;
    assert!(y.abs() < 1e-9, "ball left at y = {}", y);
    assert_eq!(world.particle(b).unwrap().position, Vector3::new2(5.0, 0.0));
}

#[test]
fn adaptive_budget_tracks_contact_count() {
    let mut world: World<f64> = World::with_config(WorldConfig::new().with_max_contacts(16));
    for i in 0..3 {
        let id = world.add_particle(Particle::new(Vector3::new2(i as f64, -1.0)));
        world
            .contact_registry_mut()
            .add(Panel::new(id, Vector3::zero(), Vector3::new2(0.0, 1.0), 0.0));
    }
    world.step(1.0 / 60.0);
    assert_eq!(world.resolver().iterations(), 6);
    assert_eq!(world.resolver().iterations_used(), 3);

    let mut fixed: World<f64> = World::new(16, 5);
    let id = fixed.add_particle(Particle::new(Vector3::new2(0.0, -1.0)));
    fixed
        .contact_registry_mut()
        .add(Panel::new(id, Vector3::zero(), Vector3::new2(0.0, 1.0), 0.0));
    fixed.step(1.0 / 60.0);
    assert_eq!(fixed.resolver().iterations(), 5);
}

#[test]
fn small_budget_leaves_penetration_for_later_steps() {
    let mut world: World<f64> = World::new(16, 1);
    let ids: Vec<_> = (0..3)
        .map(|i| world.add_particle(Particle::new(Vector3::new2(i as f64, -1.0))))
        .collect();
    for &id in &ids {
        world
            .contact_registry_mut()
            .add(Panel::new(id, Vector3::zero(), Vector3::new2(0.0, 1.0), 0.0));
    }

    world.step(1.0 / 60.0);
    let resolved = ids.iter().filter(|&&id| world.particle(id).unwrap().position.y >= 0.0).count();
    assert_eq!(resolved, 1);

    world.step(1.0 / 60.0);
    world.step(1.0 / 60.0);
    for &id in &ids {
        assert!(world.particle(id).unwrap().position.y > -1e-9);
    }
}
