//! Conserved quantities of an [`Environment`].
//!
//! Merges conserve mass and momentum exactly but throw kinetic energy away, so
//! only the first two are expected to stay put across collisions.

use crate::prelude::*;

impl Environment {
	pub fn total_mass(&self) -> Scalar {
		self.bodies().map(|(_, b)| b.mass()).sum()
	}

	/// sum_i m_i * v_i
	pub fn total_momentum(&self) -> Vec3 {
		self.bodies().fold(Vec3::zeros(), |p, (_, b)| p + b.momentum())
	}

	/// Mass-weighted mean position, `None` for an empty environment.
	pub fn center_of_mass(&self) -> Option<Vec3> {
		if self.is_empty() {
			return None;
		}
		let weighted = self.bodies().fold(Vec3::zeros(), |c, (_, b)| c + b.pos * b.mass());
		Some(weighted / self.total_mass())
	}

	/// sum_i 0.5 * m_i * |v_i|^2
	pub fn kinetic_energy(&self) -> Scalar {
		self.bodies().map(|(_, b)| 0.5 * b.mass() * b.vel.norm_squared()).sum()
	}

	/// -sum_{i<j} m_i * m_j / r_ij, skipping coincident pairs.
	pub fn potential_energy(&self) -> Scalar {
		let bodies: Vec<&Body> = self.bodies().map(|(_, b)| b).collect();
		let mut energy = 0.0;
		for (i, a) in bodies.iter().enumerate() {
			for b in &bodies[i + 1..] {
				let r = a.dist(b);
				if r > 0.0 {
					energy -= a.mass() * b.mass() / r;
				}
			}
		}
		energy
	}
}

/// Snapshot of the conserved quantities, used to measure drift over a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conservation {
	pub mass: Scalar,
	pub momentum: Vec3,
	pub energy: Scalar,
}

impl Conservation {
	pub fn measure(env: &Environment) -> Self {
		Conservation {
			mass: env.total_mass(),
			momentum: env.total_momentum(),
			energy: env.kinetic_energy() + env.potential_energy(),
		}
	}

	/// Relative energy change against `baseline`, absolute when the baseline is ~0.
	pub fn energy_drift(&self, baseline: &Self) -> Scalar {
		let delta = (self.energy - baseline.energy).abs();
		if baseline.energy.abs() > 1e-12 {
			delta / baseline.energy.abs()
		} else {
			delta
		}
	}

	pub fn momentum_drift(&self, baseline: &Self) -> Scalar {
		(self.momentum - baseline.momentum).norm()
	}
}
