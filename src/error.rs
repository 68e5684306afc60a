use std::path::PathBuf;

use snafu::Snafu;

use crate::{ids::BodyId, prelude::Scalar};

#[derive(Debug, Snafu)]
#[snafu(context(suffix(Err)))]
#[snafu(visibility(pub(crate)))]
pub enum Error {
	#[snafu(display("Body mass must be positive and finite, got {mass}"))]
	InvalidMass { mass: Scalar },

	#[snafu(display("Time warp must be non-negative and finite, got {time_warp}"))]
	InvalidTimeWarp { time_warp: Scalar },

	#[snafu(display("Fixed step must be positive and finite, got {fixed_step}"))]
	InvalidFixedStep { fixed_step: Scalar },

	#[snafu(display("Elapsed time must be non-negative and finite, got {elapsed}"))]
	InvalidElapsed { elapsed: Scalar },

	#[snafu(display("Every body id of this environment has been handed out"))]
	IdsExhausted,

	#[snafu(display("{id} is not part of this environment"))]
	UnknownBody { id: BodyId },

	#[snafu(display("Couldn't read scenario file {}", path.display()))]
	ScenarioIo { path: PathBuf, source: std::io::Error },

	#[snafu(display("Couldn't parse scenario"))]
	ScenarioParse { source: serde_yaml::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
