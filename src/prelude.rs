pub use nalgebra as na;

pub type Scalar = f64;

pub type Vec3 = na::Vector3<Scalar>;
pub type Point3 = na::Point3<Scalar>;

pub use crate::{
    Environment,
    StepReport,
    Absorption,
    body::Body,
    config::{EnvironmentConfig, Scenario},
    error::{Error, Result},
    ids::BodyId,
    launcher::Launch,
};
