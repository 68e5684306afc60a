use crate::prelude::*;

/// Mass given to every launched body.
pub const LAUNCH_MASS: Scalar = 0.1;
/// Launch velocity per unit of drag length.
pub const LAUNCH_SPEED_SCALE: Scalar = 5.0;

/// A drag from `start` to `end` in the environment's frame, turned into a new body
/// at `start` moving along the drag direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
	pub start: Vec3,
	pub end: Vec3,
}

impl Launch {
	pub fn new(start: Vec3, end: Vec3) -> Self {
		Launch { start, end }
	}

	pub fn velocity(&self) -> Vec3 {
		(self.end - self.start) * LAUNCH_SPEED_SCALE
	}

	pub fn into_body(self) -> Result<Body> {
		Body::new(LAUNCH_MASS, self.start, self.velocity())
	}
}
