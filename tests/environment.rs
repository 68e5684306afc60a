use accrete::{diagnostics::Conservation, launcher::LAUNCH_MASS, prelude::*};

fn init_logging() {
	let _ = env_logger::builder().is_test(true).try_init();
}

fn environment(fixed_step: Scalar, time_warp: Scalar) -> Environment {
	init_logging();
	Environment::new(EnvironmentConfig { fixed_step, time_warp }).unwrap()
}

fn v(x: Scalar, y: Scalar, z: Scalar) -> Vec3 {
	Vec3::new(x, y, z)
}

/// Three bodies far enough apart to never touch within a few seconds.
fn spread_system(env: &mut Environment) -> Vec<BodyId> {
	vec![
		env.create_body(5.0, v(0.0, 0.0, 0.0), v(0.0, 0.5, 0.0)).unwrap(),
		env.create_body(1.0, v(6.0, 0.0, 0.0), v(0.0, -1.0, 0.0)).unwrap(),
		env.create_body(2.0, v(0.0, -8.0, 3.0), v(0.3, 0.0, 0.0)).unwrap(),
	]
}

// ==================================================================================
// Accumulator
// ==================================================================================

#[test]
fn advance_runs_whole_steps_and_keeps_the_remainder() {
	let mut env = environment(0.001, 1.0);
	spread_system(&mut env);

	let report = env.advance(0.001 * 3.5).unwrap();

	assert_eq!(report.steps, 3);
	assert!((env.accumulated_time() - 0.0005).abs() < 1e-12);
}

#[test]
fn remainder_carries_over_between_ticks() {
	let mut env = environment(0.001, 1.0);

	assert_eq!(env.advance(0.0006).unwrap().steps, 0);
	assert_eq!(env.advance(0.0006).unwrap().steps, 1);
	assert!((env.accumulated_time() - 0.0002).abs() < 1e-12);
}

#[test]
fn time_warp_scales_elapsed_time() {
	let mut env = environment(0.25, 4.0);

	// 0.5 real seconds -> 2.0 simulated seconds -> 7 steps, 0.25 left over
	let report = env.advance(0.5).unwrap();

	assert_eq!(report.steps, 7);
	assert_eq!(env.accumulated_time(), 0.25);
	assert!(env.accumulated_time() <= env.fixed_step());
}

#[test]
fn zero_time_warp_freezes_everything() {
	let mut env = environment(0.001, 0.0);
	let ids = spread_system(&mut env);
	let before: Vec<Body> = env.bodies().map(|(_, b)| b.clone()).collect();

	for _ in 0..50 {
		assert_eq!(env.advance(0.5).unwrap().steps, 0);
	}

	assert_eq!(env.accumulated_time(), 0.0);
	for (id, old) in ids.iter().zip(before.iter()) {
		let body = env.body(*id).unwrap();
		assert_eq!(body.position(), old.position());
		assert_eq!(body.velocity(), old.velocity());
	}
}

#[test]
fn time_warp_can_change_between_ticks() {
	let mut env = environment(0.001, 0.0);
	spread_system(&mut env);

	assert!(matches!(env.set_time_warp(-1.0), Err(Error::InvalidTimeWarp { .. })));
	assert_eq!(env.time_warp(), 0.0);

	env.set_time_warp(1.0).unwrap();
	assert_eq!(env.advance(0.0105).unwrap().steps, 10);
}

// ==================================================================================
// Gravity
// ==================================================================================

#[test]
fn lighter_body_accelerates_ten_times_faster() {
	let mut env = environment(0.01, 1.0);
	let heavy = env.create_body(10.0, v(0.0, 0.0, 0.0), Vec3::zeros()).unwrap();
	let light = env.create_body(1.0, v(1.0, 0.0, 0.0), Vec3::zeros()).unwrap();

	let report = env.step();
	assert!(report.absorptions.is_empty());

	let dv_heavy = env.body(heavy).unwrap().velocity();
	let dv_light = env.body(light).unwrap().velocity();

	assert!(dv_light.x < 0.0, "light body didn't move toward the heavy one");
	assert!(dv_heavy.x > 0.0, "heavy body didn't move toward the light one");
	assert!(((dv_heavy.x / dv_light.x).abs() - 0.1).abs() < 1e-12);

	// F = 10 * 1 / 1^2, a_light = 10, dv = a * dt
	assert!((dv_light.x + 0.1).abs() < 1e-12);
}

#[test]
fn pair_forces_are_equal_and_opposite() {
	let mut env = environment(0.01, 1.0);
	let a = env.create_body(3.0, v(0.5, -2.0, 1.0), Vec3::zeros()).unwrap();
	let b = env.create_body(7.0, v(-3.0, 1.5, 4.0), Vec3::zeros()).unwrap();

	{
		let (a, b) = (env.body(a).unwrap(), env.body(b).unwrap());
		assert_eq!(a.attraction(b), -b.attraction(a));
	}

	env.step();

	let (a, b) = (env.body(a).unwrap(), env.body(b).unwrap());
	let fa = a.acceleration() * a.mass();
	let fb = b.acceleration() * b.mass();
	assert!((fa + fb).norm() < 1e-12, "net force not zero: {:?}", fa + fb);
}

#[test]
fn momentum_is_conserved_without_collisions() {
	let mut env = environment(0.001, 1.0);
	spread_system(&mut env);
	let baseline = Conservation::measure(&env);

	for _ in 0..60 {
		let report = env.advance(1.0 / 60.0).unwrap();
		assert!(report.absorptions.is_empty());
	}

	let end = Conservation::measure(&env);
	assert_eq!(env.len(), 3);
	assert!(end.momentum_drift(&baseline) < 1e-9, "momentum drifted by {}", end.momentum_drift(&baseline));
	assert_eq!(end.mass, baseline.mass);
}

#[test]
fn circular_orbit_stays_bound() {
	let mut env = environment(0.001, 1.0);
	let star = env.create_body(1000.0, Vec3::zeros(), Vec3::zeros()).unwrap();
	let planet = env.create_body(0.001, v(5.0, 0.0, 0.0), v(0.0, (1000.0_f64 / 5.0).sqrt(), 0.0)).unwrap();
	let baseline = Conservation::measure(&env);

	// over half a period (2 pi r / v ~ 2.2s)
	for _ in 0..80 {
		env.advance(1.0 / 60.0).unwrap();
	}

	let r = env.body(planet).unwrap().dist(env.body(star).unwrap());
	assert!((r - 5.0).abs() < 0.05, "orbit radius drifted to {}", r);
	assert!(Conservation::measure(&env).energy_drift(&baseline) < 1e-2);
}

// ==================================================================================
// Collisions
// ==================================================================================

#[test]
fn coincident_bodies_merge_into_one() {
	let mut env = environment(0.001, 1.0);
	let big = env.create_body(5.0, v(1.0, 2.0, 3.0), v(1.0, 0.0, 0.0)).unwrap();
	let small = env.create_body(3.0, v(1.0, 2.0, 3.0), v(0.0, 2.0, 0.0)).unwrap();
	let momentum = env.total_momentum();

	let report = env.advance(0.0015).unwrap();

	assert_eq!(report.steps, 1);
	assert_eq!(report.removed().collect::<Vec<_>>(), vec![small]);
	assert_eq!(env.len(), 1);
	assert!(env.body(small).is_none());

	let merged = env.body(big).unwrap();
	assert_eq!(merged.mass(), 8.0);
	assert!((merged.momentum() - momentum).norm() < 1e-12);
	assert!((merged.velocity() - v(5.0 / 8.0, 6.0 / 8.0, 0.0)).norm() < 1e-12);
	// merged at (1, 2, 3), then moved for one step
	let expected = v(1.0, 2.0, 3.0) + merged.velocity() * 0.001;
	assert!((merged.position() - expected).norm() < 1e-12);
}

#[test]
fn heavier_body_absorbs_regardless_of_order() {
	let mut env = environment(0.001, 1.0);
	let small = env.create_body(1.0, v(0.0, 0.0, 0.0), Vec3::zeros()).unwrap();
	let big = env.create_body(4.0, v(0.05, 0.0, 0.0), Vec3::zeros()).unwrap();

	let report = env.step();

	assert_eq!(
		report.absorptions,
		vec![Absorption {
			survivor: big,
			absorbed: small
		}]
	);
	assert!((env.body(big).unwrap().position() - v(0.04, 0.0, 0.0)).norm() < 1e-12);
}

#[test]
fn falling_pair_eventually_merges() {
	init_logging();
	let path = concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios/binary_merge.yaml");
	let scenario = Scenario::load(path).unwrap();
	let mut env = scenario.build().unwrap();
	let baseline = Conservation::measure(&env);

	let mut removed = Vec::new();
	for _ in 0..scenario.runner.frames() {
		let report = env.advance(scenario.runner.frame_seconds()).unwrap();
		removed.extend(report.removed());
	}

	assert_eq!(removed, vec![BodyId(1)]);
	assert_eq!(env.len(), 1);
	let end = Conservation::measure(&env);
	assert_eq!(end.mass, 11.0);
	assert!(end.momentum_drift(&baseline) < 1e-9);
	// inelastic: the merged body is left (almost) at rest
	assert!(env.kinetic_energy() < 1e-12);
}

#[test]
fn missing_scenario_file_is_an_io_error() {
	let err = Scenario::load("does/not/exist.yaml").unwrap_err();
	assert!(matches!(err, Error::ScenarioIo { .. }));
}

// ==================================================================================
// Host interaction
// ==================================================================================

#[test]
fn launched_bodies_join_the_simulation() {
	let mut env = environment(0.001, 1.0);
	env.create_body(1000.0, Vec3::zeros(), Vec3::zeros()).unwrap();

	let id = env.launch(&Launch::new(v(5.0, 0.0, 0.0), v(5.0, 1.0, 0.0))).unwrap();

	let body = env.body(id).unwrap();
	assert_eq!(body.mass(), LAUNCH_MASS);
	assert_eq!(body.velocity(), v(0.0, 5.0, 0.0));

	env.advance(0.0105).unwrap();
	assert!(env.body(id).unwrap().velocity().x < 0.0);
}

#[test]
fn host_removal_between_ticks() {
	let mut env = environment(0.001, 1.0);
	let ids = spread_system(&mut env);

	let removed = env.remove_body(ids[1]).unwrap();
	assert_eq!(removed.mass(), 1.0);
	assert!(matches!(env.remove_body(ids[1]), Err(Error::UnknownBody { .. })));

	env.advance(0.01).unwrap();
	assert_eq!(env.bodies().map(|(id, _)| id).collect::<Vec<_>>(), vec![ids[0], ids[2]]);
}
