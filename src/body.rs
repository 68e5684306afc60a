use snafu::ensure;

use crate::{error::InvalidMassErr, prelude::*};

/// A point mass living inside an [`Environment`].
///
/// Position and velocity are expressed in the environment's local frame.
/// The mass is only reachable through [`Body::mass`] so that it stays positive.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    mass: Scalar,
    pub pos: Vec3,
    pub vel: Vec3,
    pub acc: Vec3,
}

impl Body {
    pub fn new(mass: Scalar, pos: Vec3, vel: Vec3) -> Result<Self> {
        ensure!(mass > 0.0 && mass.is_finite(), InvalidMassErr { mass });

        Ok(Body {
            mass,
            pos,
            vel,
            acc: Vec3::zeros(),
        })
    }

    pub fn mass(&self) -> Scalar {
        self.mass
    }

    pub fn position(&self) -> Vec3 {
        self.pos
    }

    pub fn velocity(&self) -> Vec3 {
        self.vel
    }

    pub fn acceleration(&self) -> Vec3 {
        self.acc
    }

    pub fn momentum(&self) -> Vec3 {
        self.vel * self.mass
    }

    /// Radius used for collision tests, derived from the mass on every call.
    pub fn radius(&self) -> Scalar {
        self.mass.cbrt() / 10.0
    }

    pub fn dist(&self, other: &Self) -> Scalar {
        na::distance(&Point3::from(self.pos), &Point3::from(other.pos))
    }

    pub fn dist2(&self, other: &Self) -> Scalar {
        na::distance_squared(&Point3::from(self.pos), &Point3::from(other.pos))
    }

    // a = F / m
    pub fn apply_force(&mut self, force: Vec3) {
        self.acc += force / self.mass;
    }

    pub fn reset_acceleration(&mut self) {
        self.acc = Vec3::zeros();
    }

    /// Semi-implicit Euler: velocity first, then position from the new velocity.
    pub fn integrate(&mut self, dt: Scalar) {
        self.vel += self.acc * dt;
        self.pos += self.vel * dt;
    }

    /// Touching spheres count as colliding.
    pub fn collides_with(&self, other: &Self) -> bool {
        self.dist(other) <= self.radius() + other.radius()
    }

    /// Gravitational force this body exerts on `other`, with G = 1.
    ///
    /// Undefined for coincident bodies; callers check [`Body::collides_with`] first,
    /// which always holds at zero separation.
    pub fn attraction(&self, other: &Self) -> Vec3 {
        // F = m1 * m2 / r^2
        let offset = self.pos - other.pos;
        let f = self.mass * other.mass / offset.norm_squared();
        offset.normalize() * f
    }

    /// Merges `other` into this body, conserving mass and momentum.
    pub fn absorb(&mut self, other: &Self) {
        let mass = self.mass + other.mass;
        self.pos = (self.pos * self.mass + other.pos * other.mass) / mass;
        self.vel = (self.vel * self.mass + other.vel * other.mass) / mass;
        self.mass = mass;
    }
}
