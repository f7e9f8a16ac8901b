//! Common types used throughout action_set_generator

use std::f64::consts::PI;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::common::error::{ActionSetError, ActionSetResult};

/// 2D point representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<Vector2<f64>> for Point2D {
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

/// 2D pose (position + orientation)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose2D {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
}

impl Pose2D {
    pub fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self { x, y, yaw }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0, yaw: 0.0 }
    }

    /// Normalize yaw to [-pi, pi]. A non-finite yaw becomes NaN.
    pub fn normalize_yaw(&mut self) {
        self.yaw = (self.yaw + PI).rem_euclid(2.0 * PI) - PI;
    }
}

/// Control input for differential drive robot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlInput {
    pub v: f64,      // linear velocity [m/s]
    pub omega: f64,  // angular velocity [rad/s]
}

impl ControlInput {
    pub fn new(v: f64, omega: f64) -> Self {
        Self { v, omega }
    }
}

/// Convergence tolerance used by a planner to match configurations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    /// Position tolerance
    pub xy: f64,
    /// Heading tolerance [deg]
    pub theta: f64,
}

impl Threshold {
    pub fn new(xy: f64, theta: f64) -> Self {
        Self { xy, theta }
    }

    pub fn validate(&self, name: &str) -> ActionSetResult<()> {
        if !(self.xy.is_finite() && self.xy > 0.0) {
            return Err(ActionSetError::invalid(format!(
                "{} xy threshold must be positive, got {}",
                name, self.xy
            )));
        }
        if !(self.theta.is_finite() && self.theta > 0.0) {
            return Err(ActionSetError::invalid(format!(
                "{} theta threshold must be positive, got {}",
                name, self.theta
            )));
        }
        Ok(())
    }
}

/// Node-merging and goal-reaching tolerances carried by continuous action sets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceThresholds {
    pub node: Threshold,
    pub goal: Threshold,
}

impl ConvergenceThresholds {
    pub fn new(node: Threshold, goal: Threshold) -> Self {
        Self { node, goal }
    }

    pub fn validate(&self) -> ActionSetResult<()> {
        self.node.validate("node")?;
        self.goal.validate("goal")
    }
}

impl Default for ConvergenceThresholds {
    fn default() -> Self {
        Self {
            node: Threshold::new(0.5, 30.0),
            goal: Threshold::new(1.5, 30.0),
        }
    }
}

/// Parameters the generator may ask a supplier for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Radius-theta travel distance
    Distance,
    /// Radius-theta angular step [deg]
    Theta,
    /// Number of radius-theta branches
    Branches,
    /// Left and right wheel speeds [rpm]
    WheelRpm,
}

impl ParameterKind {
    pub fn name(&self) -> &'static str {
        match self {
            ParameterKind::Distance => "dist",
            ParameterKind::Theta => "theta",
            ParameterKind::Branches => "n_branches",
            ParameterKind::WheelRpm => "wheel_rpm",
        }
    }
}

/// Inclusive integer bounds for a supplied parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntBounds {
    pub min: i64,
    pub max: i64,
}

impl IntBounds {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn check(&self, kind: ParameterKind, value: i64) -> ActionSetResult<i64> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(ActionSetError::invalid(format!(
                "{} must be in [{}, {}], got {}",
                kind.name(),
                self.min,
                self.max,
                value
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point2d_distance() {
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(3.0, 4.0);
        assert!((p1.distance(&p2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_pose2d_normalize_yaw() {
        let mut pose = Pose2D::new(0.0, 0.0, 4.0);
        pose.normalize_yaw();
        assert!(pose.yaw >= -PI && pose.yaw <= PI);
        assert!((pose.yaw - (4.0 - 2.0 * PI)).abs() < 1e-10);
    }

    #[test]
    fn test_pose2d_normalize_large_yaw() {
        let mut pose = Pose2D::new(0.0, 0.0, 1e20);
        pose.normalize_yaw();
        assert!(pose.yaw >= -PI && pose.yaw <= PI);

        let mut pose = Pose2D::new(0.0, 0.0, -7.5 * PI);
        pose.normalize_yaw();
        assert!((pose.yaw - 0.5 * PI).abs() < 1e-10);

        let mut pose = Pose2D::new(0.0, 0.0, f64::INFINITY);
        pose.normalize_yaw();
        assert!(pose.yaw.is_nan());
    }

    #[test]
    fn test_default_thresholds() {
        let thresholds = ConvergenceThresholds::default();
        assert_eq!(thresholds.node, Threshold::new(0.5, 30.0));
        assert_eq!(thresholds.goal, Threshold::new(1.5, 30.0));
        assert!(thresholds.validate().is_ok());
    }

    #[test]
    fn test_non_positive_threshold_rejected() {
        let thresholds =
            ConvergenceThresholds::new(Threshold::new(0.0, 30.0), Threshold::new(1.5, 30.0));
        assert!(thresholds.validate().is_err());

        let thresholds =
            ConvergenceThresholds::new(Threshold::new(0.5, 30.0), Threshold::new(1.5, -1.0));
        assert!(thresholds.validate().is_err());
    }

    #[test]
    fn test_int_bounds_inclusive() {
        let bounds = IntBounds::new(1, 10);
        assert!(bounds.contains(1));
        assert!(bounds.contains(10));
        assert!(!bounds.contains(0));
        assert!(!bounds.contains(11));
        assert_eq!(bounds.check(ParameterKind::Distance, 7).unwrap(), 7);
        assert!(bounds.check(ParameterKind::Distance, 11).is_err());
    }
}
