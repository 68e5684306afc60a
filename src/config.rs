//! Simulation configuration and YAML scenarios.
//!
//! [`EnvironmentConfig`] carries the two rate parameters every [`Environment`] needs.
//! [`Scenario`] wraps it together with an initial set of bodies and the settings a
//! headless host uses to drive the environment.
//!
//! ```yaml
//! environment:
//!   fixed_step: 0.001   # simulated seconds per step
//!   time_warp: 1.0      # simulated seconds per real second
//!
//! runner:
//!   frame_rate: 60.0
//!   duration: 10.0
//!   max_frame_seconds: 0.25
//!
//! bodies:
//!   - mass: 1000.0
//!     position: [0.0, 0.0, 0.0]
//!   - mass: 1.0
//!     position: [5.0, 0.0, 0.0]
//!     velocity: [0.0, 14.142, 0.0]
//! ```

use std::{fs, path::Path};

use serde::Deserialize;
use snafu::{ensure, ResultExt};

use crate::{
	error::{InvalidFixedStepErr, InvalidTimeWarpErr, ScenarioIoErr, ScenarioParseErr},
	prelude::*,
};

/// Rate parameters of an [`Environment`].
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct EnvironmentConfig {
	pub fixed_step: Scalar, // simulated seconds integrated per step
	pub time_warp: Scalar,  // simulated seconds per real second
}

impl Default for EnvironmentConfig {
	fn default() -> Self {
		EnvironmentConfig {
			fixed_step: 0.001,
			time_warp: 1.0,
		}
	}
}

impl EnvironmentConfig {
	pub fn validate(&self) -> Result<()> {
		validate_fixed_step(self.fixed_step)?;
		validate_time_warp(self.time_warp)
	}
}

pub(crate) fn validate_fixed_step(fixed_step: Scalar) -> Result<()> {
	ensure!(fixed_step > 0.0 && fixed_step.is_finite(), InvalidFixedStepErr { fixed_step });
	Ok(())
}

pub(crate) fn validate_time_warp(time_warp: Scalar) -> Result<()> {
	ensure!(time_warp >= 0.0 && time_warp.is_finite(), InvalidTimeWarpErr { time_warp });
	Ok(())
}

/// Initial state of a single body.
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
	pub mass: Scalar,
	pub position: [Scalar; 3],
	#[serde(default)]
	pub velocity: [Scalar; 3],
}

/// How a host drives the environment: frames of `1 / frame_rate` real seconds,
/// each capped at `max_frame_seconds`, for `duration` real seconds.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
	pub frame_rate: Scalar,
	pub duration: Scalar,
	pub max_frame_seconds: Scalar,
}

impl Default for RunnerConfig {
	fn default() -> Self {
		RunnerConfig {
			frame_rate: 60.0,
			duration: 10.0,
			max_frame_seconds: 0.25,
		}
	}
}

impl RunnerConfig {
	/// Real seconds handed to a single `advance` call.
	pub fn frame_seconds(&self) -> Scalar {
		(1.0 / self.frame_rate).min(self.max_frame_seconds)
	}

	pub fn frames(&self) -> usize {
		(self.duration * self.frame_rate).round().max(0.0) as usize
	}
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Scenario {
	#[serde(default)]
	pub environment: EnvironmentConfig,
	#[serde(default)]
	pub runner: RunnerConfig,
	#[serde(default)]
	pub bodies: Vec<BodyConfig>,
}

impl Scenario {
	pub fn from_yaml_str(yaml: &str) -> Result<Self> {
		serde_yaml::from_str(yaml).context(ScenarioParseErr)
	}

	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let yaml = fs::read_to_string(path).context(ScenarioIoErr { path })?;
		Self::from_yaml_str(&yaml)
	}

	/// Builds an environment holding every body of the scenario, in listed order.
	pub fn build(&self) -> Result<Environment> {
		let mut env = Environment::new(self.environment)?;
		for b in &self.bodies {
			env.create_body(b.mass, Vec3::from(b.position), Vec3::from(b.velocity))?;
		}
		Ok(env)
	}
}
