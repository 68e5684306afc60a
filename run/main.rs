use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use accrete::{config::BodyConfig, diagnostics::Conservation, prelude::*};

/// Runs a scenario headless, driving the environment the way a render loop would.
#[derive(Parser, Debug)]
struct Args {
	/// Scenario YAML; a small star system is used when omitted
	#[arg(short, long)]
	scenario: Option<PathBuf>,

	/// Real seconds to run for, overriding the scenario
	#[arg(short, long)]
	duration: Option<Scalar>,

	/// Simulated seconds per real second, overriding the scenario
	#[arg(short, long)]
	time_warp: Option<Scalar>,

	/// -v for debug, -vv for per-step tracing
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,
}

fn setup_logging(verbose: u8) -> Result<()> {
	let level = match verbose {
		0 => log::LevelFilter::Info,
		1 => log::LevelFilter::Debug,
		_ => log::LevelFilter::Trace,
	};

	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!(
				"{}[{}][{}] {}",
				chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
				record.target(),
				record.level(),
				message
			))
		})
		.level(level)
		.chain(std::io::stdout())
		.apply()
		.context("Couldn't install logger")
}

// A heavy star with two orbiting planets and a moon on a collision course.
fn demo_scenario() -> Scenario {
	let body = |mass, position, velocity| BodyConfig { mass, position, velocity };
	// circular speed around the star: sqrt(M / r)
	let orbit = |r: Scalar| (1000.0 / r).sqrt();

	Scenario {
		bodies: vec![
			body(1000.0, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
			body(1.0, [5.0, 0.0, 0.0], [0.0, orbit(5.0), 0.0]),
			body(2.0, [0.0, 0.0, -9.0], [orbit(9.0), 0.0, 0.0]),
			body(0.1, [0.0, 3.0, 0.0], [0.0, -20.0, 0.0]),
		],
		..Default::default()
	}
}

fn main() -> Result<()> {
	let args = Args::parse();
	setup_logging(args.verbose)?;

	let mut scenario = match &args.scenario {
		Some(path) => Scenario::load(path).with_context(|| format!("Couldn't load {}", path.display()))?,
		None => demo_scenario(),
	};
	if let Some(duration) = args.duration {
		scenario.runner.duration = duration;
	}
	if let Some(time_warp) = args.time_warp {
		scenario.environment.time_warp = time_warp;
	}

	let mut env = scenario.build()?;
	let runner = scenario.runner;
	let baseline = Conservation::measure(&env);
	info!(
		"Starting with {} bodies, fixed step {}s, time warp {}",
		env.len(),
		env.fixed_step(),
		env.time_warp()
	);

	let frame = runner.frame_seconds();
	let frames_per_second = runner.frame_rate.round().max(1.0) as usize;
	let mut steps = 0;
	let mut merges = 0;

	for n in 0..runner.frames() {
		let report = env.advance(frame)?;
		steps += report.steps;
		merges += report.absorptions.len();

		if (n + 1) % frames_per_second == 0 {
			debug!(
				"t = {:.2}s: {} bodies, {} steps so far",
				(n + 1) as Scalar * frame,
				env.len(),
				steps
			);
		}
	}

	let end = Conservation::measure(&env);
	info!("Finished: {} steps, {} merges, {} bodies left", steps, merges, env.len());
	for (id, body) in env.bodies() {
		info!(
			"{}: mass {:.3}, position {:?}, velocity {:?}",
			id,
			body.mass(),
			body.pos.as_slice(),
			body.vel.as_slice()
		);
	}
	info!(
		"Mass {} -> {}, momentum drift {:.3e}, energy drift {:.3e}",
		baseline.mass,
		end.mass,
		end.momentum_drift(&baseline),
		end.energy_drift(&baseline)
	);

	Ok(())
}
