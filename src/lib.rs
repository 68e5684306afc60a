use log::{debug, info, trace, warn};
use snafu::{ensure, OptionExt};

use crate::{
	config::{validate_time_warp, EnvironmentConfig},
	error::{IdsExhaustedErr, InvalidElapsedErr, UnknownBodyErr},
	prelude::*,
};

pub mod body;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod ids;
pub mod launcher;
pub mod prelude;

/// `advance` calls running more steps than this are logged as a catch-up burst.
pub const BURST_WARN_STEPS: usize = 10_000;

/// One body merging into another during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Absorption {
	pub survivor: BodyId,
	pub absorbed: BodyId,
}

/// What happened during a call to [`Environment::advance`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
	pub steps: usize,
	/// Every merge, in the order it happened.
	pub absorptions: Vec<Absorption>,
}

impl StepReport {
	/// Ids that are no longer part of the environment.
	pub fn removed(&self) -> impl Iterator<Item = BodyId> + '_ {
		self.absorptions.iter().map(|a| a.absorbed)
	}
}

/// A set of bodies attracting each other, advanced in fixed steps.
pub struct Environment {
	bodies: Vec<(BodyId, Body)>,
	config: EnvironmentConfig,
	accumulated_time: Scalar,
	next_id: u32,
	// scratch for the step currently running, indexed like `bodies`
	absorbed: Vec<bool>,
}

impl Default for Environment {
	fn default() -> Self {
		Environment {
			bodies: Vec::new(),
			config: EnvironmentConfig::default(),
			accumulated_time: 0.0,
			next_id: 0,
			absorbed: Vec::new(),
		}
	}
}

impl Environment {
	pub fn new(config: EnvironmentConfig) -> Result<Self> {
		config.validate()?;
		Ok(Environment {
			config,
			..Default::default()
		})
	}

	pub fn config(&self) -> EnvironmentConfig {
		self.config
	}

	pub fn fixed_step(&self) -> Scalar {
		self.config.fixed_step
	}

	pub fn time_warp(&self) -> Scalar {
		self.config.time_warp
	}

	/// Simulated time carried over to the next `advance` call.
	pub fn accumulated_time(&self) -> Scalar {
		self.accumulated_time
	}

	/// Replaces both rate parameters. Nothing changes if `config` is invalid.
	pub fn reconfigure(&mut self, config: EnvironmentConfig) -> Result<()> {
		config.validate()?;
		debug!("Reconfigured environment: {:?}", config);
		self.config = config;
		Ok(())
	}

	pub fn set_time_warp(&mut self, time_warp: Scalar) -> Result<()> {
		validate_time_warp(time_warp)?;
		debug!("Time warp {} -> {}", self.config.time_warp, time_warp);
		self.config.time_warp = time_warp;
		Ok(())
	}

	/// Shifts the time warp by a quarter of `delta`, stopping at zero.
	pub fn nudge_time_warp(&mut self, delta: Scalar) -> Result<Scalar> {
		let time_warp = (self.config.time_warp + delta / 4.0).max(0.0);
		self.set_time_warp(time_warp)?;
		Ok(time_warp)
	}

	pub fn create_body(&mut self, mass: Scalar, pos: Vec3, vel: Vec3) -> Result<BodyId> {
		let body = Body::new(mass, pos, vel)?;
		self.insert(body)
	}

	pub fn launch(&mut self, launch: &Launch) -> Result<BodyId> {
		let body = launch.into_body()?;
		self.insert(body)
	}

	/// Adds an already validated body and returns its new id, failing once every id
	/// has been handed out.
	pub fn insert(&mut self, body: Body) -> Result<BodyId> {
		let id = BodyId(self.next_id);
		self.next_id = self.next_id.checked_add(1).context(IdsExhaustedErr)?;
		debug!("Created {} with mass {} at {:?}", id, body.mass(), body.pos.as_slice());
		self.bodies.push((id, body));
		Ok(id)
	}

	pub fn remove_body(&mut self, id: BodyId) -> Result<Body> {
		let idx = self.index_of(id).context(UnknownBodyErr { id })?;
		let (_, body) = self.bodies.remove(idx);
		debug!("Removed {}", id);
		Ok(body)
	}

	pub fn body(&self, id: BodyId) -> Option<&Body> {
		self.index_of(id).map(|idx| &self.bodies[idx].1)
	}

	pub fn contains(&self, id: BodyId) -> bool {
		self.index_of(id).is_some()
	}

	/// Bodies in collection order.
	pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> + '_ {
		self.bodies.iter().map(|(id, body)| (*id, body))
	}

	pub fn len(&self) -> usize {
		self.bodies.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bodies.is_empty()
	}

	fn index_of(&self, id: BodyId) -> Option<usize> {
		self.bodies.iter().position(|(other, _)| *other == id)
	}

	/// Feeds `elapsed` real seconds, scaled by the time warp, into the accumulator and
	/// runs as many fixed steps as it can pay for.
	///
	/// The number of steps is not capped here. Hosts that can stall for a long time
	/// should clamp `elapsed` before calling. A warped total too large to step through
	/// is rejected with `InvalidElapsed`.
	pub fn advance(&mut self, elapsed: Scalar) -> Result<StepReport> {
		ensure!(elapsed >= 0.0 && elapsed.is_finite(), InvalidElapsedErr { elapsed });

		// Subtracting a step must still change the total, or the loop below never ends
		let fixed_step = self.config.fixed_step;
		let total = self.accumulated_time + elapsed * self.config.time_warp;
		ensure!(
			total.is_finite() && (total <= fixed_step || total - fixed_step < total),
			InvalidElapsedErr { elapsed }
		);
		self.accumulated_time = total;

		let mut report = StepReport::default();
		while self.accumulated_time > self.config.fixed_step {
			self.step_into(&mut report.absorptions);
			self.accumulated_time -= self.config.fixed_step;
			report.steps += 1;
		}

		if report.steps > BURST_WARN_STEPS {
			warn!(
				"Ran {} steps in one advance ({}s real, warp {})",
				report.steps, elapsed, self.config.time_warp
			);
		}

		Ok(report)
	}

	/// Runs exactly one fixed step, leaving the accumulator alone.
	pub fn step(&mut self) -> StepReport {
		let mut report = StepReport {
			steps: 1,
			absorptions: Vec::new(),
		};
		self.step_into(&mut report.absorptions);
		report
	}

	fn step_into(&mut self, absorptions: &mut Vec<Absorption>) {
		let dt = self.config.fixed_step;
		trace!("step: {} bodies, dt {}", self.bodies.len(), dt);

		for (_, body) in &mut self.bodies {
			body.reset_acceleration();
		}

		self.interact(absorptions);

		// Only purge once every pair has been looked at
		let absorbed = &self.absorbed;
		let mut idx = 0;
		self.bodies.retain(|_| {
			let keep = !absorbed[idx];
			idx += 1;
			keep
		});

		for (_, body) in &mut self.bodies {
			body.integrate(dt);
		}
	}

	fn interact(&mut self, absorptions: &mut Vec<Absorption>) {
		let len = self.bodies.len();
		self.absorbed.clear();
		self.absorbed.resize(len, false);

		for i in 0..len {
			if self.absorbed[i] {
				continue;
			}

			for j in (i + 1)..len {
				if self.absorbed[j] {
					continue;
				}

				let (head, tail) = self.bodies.split_at_mut(j);
				let (id_a, a) = &mut head[i];
				let (id_b, b) = &mut tail[0];

				if !a.collides_with(b) {
					let f = a.attraction(b);
					b.apply_force(f);
					a.apply_force(-f);
					continue;
				}

				// Equal masses go to the body enumerated first
				if b.mass() > a.mass() {
					b.absorb(a);
					self.absorbed[i] = true;
					info!("{} absorbed {}, mass now {}", id_b, id_a, b.mass());
					absorptions.push(Absorption {
						survivor: *id_b,
						absorbed: *id_a,
					});
					// `i` is gone for the rest of this step
					break;
				} else {
					a.absorb(b);
					self.absorbed[j] = true;
					info!("{} absorbed {}, mass now {}", id_a, id_b, a.mass());
					absorptions.push(Absorption {
						survivor: *id_a,
						absorbed: *id_b,
					});
				}
			}
		}
	}
}
