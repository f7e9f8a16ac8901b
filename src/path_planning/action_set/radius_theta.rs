//! Radius-theta action set
//!
//! The robot first turns by one of a symmetric fan of angles, then travels
//! a fixed distance. Sharper turns can be made more expensive relative to
//! the sharpest branch of the fan.

use std::collections::BTreeMap;

use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::common::error::{ActionSetError, ActionSetResult};
use crate::common::traits::{ActionSetBuilder, MotionPrimitive, ParameterSupplier};
use crate::common::types::{ConvergenceThresholds, IntBounds, ParameterKind, Pose2D};

use super::{check_contiguous_ids, check_threshold_presence, Action, ActionSet, MoveType};

pub const DIST_DEFAULT: i64 = 5;
pub const DIST_BOUNDS: IntBounds = IntBounds::new(1, 10);
pub const THETA_DEFAULT: i64 = 30;
pub const THETA_BOUNDS: IntBounds = IntBounds::new(1, 179);
pub const BRANCHES_DEFAULT: i64 = 5;
pub const BRANCHES_BOUNDS: IntBounds = IntBounds::new(1, 10);

/// Turn-then-travel move
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusThetaMove {
    /// Travel distance in node-threshold units
    pub distance: f64,
    /// Turn applied before travelling [deg], positive is counter-clockwise
    pub turn_deg: i64,
}

impl RadiusThetaMove {
    pub fn new(distance: f64, turn_deg: i64) -> Self {
        Self { distance, turn_deg }
    }

    /// Pose reached by turning at `from` and then travelling `distance`
    pub fn end_pose(&self, from: &Pose2D) -> Pose2D {
        let yaw = from.yaw + (self.turn_deg as f64).to_radians();
        let step = Rotation2::new(yaw) * Vector2::new(self.distance, 0.0);
        let mut pose = Pose2D::new(from.x + step.x, from.y + step.y, yaw);
        pose.normalize_yaw();
        pose
    }
}

impl MotionPrimitive for RadiusThetaMove {
    type Id = usize;
    const MOVE_TYPE: MoveType = MoveType::RadiusTheta;

    // A single branch is a degenerate fan, so built sets hold at least two
    fn check_set(ids: &[&usize], has_thresholds: bool) -> ActionSetResult<()> {
        check_threshold_presence(Self::MOVE_TYPE, true, has_thresholds)?;
        let n_branches = ids.len() as i64;
        if n_branches < 2 || n_branches > BRANCHES_BOUNDS.max {
            return Err(ActionSetError::invalid(format!(
                "radius-theta action sets hold 2 to {} actions, got {}",
                BRANCHES_BOUNDS.max, n_branches
            )));
        }
        check_contiguous_ids(Self::MOVE_TYPE, ids)
    }
}

/// Run-time parameters of the fan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadiusThetaParams {
    dist: i64,
    theta: i64,
    n_branches: i64,
}

impl RadiusThetaParams {
    pub fn new(dist: i64, theta: i64, n_branches: i64) -> ActionSetResult<Self> {
        Ok(Self {
            dist: DIST_BOUNDS.check(ParameterKind::Distance, dist)?,
            theta: THETA_BOUNDS.check(ParameterKind::Theta, theta)?,
            n_branches: BRANCHES_BOUNDS.check(ParameterKind::Branches, n_branches)?,
        })
    }

    /// Ask `supplier` for distance, angular step and branch count, in that order
    pub fn request(supplier: &mut dyn ParameterSupplier) -> ActionSetResult<Self> {
        let dist = supplier.request_int(ParameterKind::Distance, DIST_DEFAULT, DIST_BOUNDS)?;
        let theta = supplier.request_int(ParameterKind::Theta, THETA_DEFAULT, THETA_BOUNDS)?;
        let n_branches =
            supplier.request_int(ParameterKind::Branches, BRANCHES_DEFAULT, BRANCHES_BOUNDS)?;
        Self::new(dist, theta, n_branches)
    }

    pub fn dist(&self) -> i64 {
        self.dist
    }

    pub fn theta(&self) -> i64 {
        self.theta
    }

    pub fn n_branches(&self) -> i64 {
        self.n_branches
    }

    pub fn is_even(&self) -> bool {
        self.n_branches % 2 == 0
    }

    /// Turn angle of branch `i` [deg]
    ///
    /// Branches sweep from the most positive angle down. An even count is
    /// shifted by half a step so the fan stays symmetric about zero.
    pub fn branch_turn(&self, i: i64) -> i64 {
        let turn = (self.n_branches / 2 - i) * self.theta;
        if self.is_even() {
            turn - self.theta / 2
        } else {
            turn
        }
    }

    /// Turn of the branch generated first, at the extreme of the sweep.
    /// Every branch's turn penalty is scaled by this angle.
    pub fn extreme_turn(&self) -> i64 {
        self.branch_turn(0)
    }

    pub fn turn_angles(&self) -> Vec<i64> {
        (0..self.n_branches).map(|i| self.branch_turn(i)).collect()
    }
}

impl Default for RadiusThetaParams {
    fn default() -> Self {
        Self {
            dist: DIST_DEFAULT,
            theta: THETA_DEFAULT,
            n_branches: BRANCHES_DEFAULT,
        }
    }
}

/// Configuration for the radius-theta action set
#[derive(Debug, Clone)]
pub struct RadiusThetaConfig {
    /// Tolerances passed through to the planner
    pub thresholds: ConvergenceThresholds,
    /// Extra cost of the sharpest turn, scaled linearly for gentler ones
    pub max_add_turn_cost: f64,
}

impl Default for RadiusThetaConfig {
    fn default() -> Self {
        Self {
            thresholds: ConvergenceThresholds::default(),
            max_add_turn_cost: 0.0,
        }
    }
}

/// Builds radius-theta action sets
#[derive(Debug, Clone)]
pub struct RadiusThetaActionSetBuilder {
    config: RadiusThetaConfig,
}

impl RadiusThetaActionSetBuilder {
    pub fn new(config: RadiusThetaConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(RadiusThetaConfig::default())
    }

    pub fn config(&self) -> &RadiusThetaConfig {
        &self.config
    }

    /// Generate the fan for already-validated parameters
    pub fn build_with_params(
        &self,
        params: &RadiusThetaParams,
    ) -> ActionSetResult<ActionSet<RadiusThetaMove>> {
        let thresholds = self.config.thresholds;
        thresholds.validate()?;

        let max_add_turn_cost = self.config.max_add_turn_cost;
        if !max_add_turn_cost.is_finite() {
            return Err(ActionSetError::invalid(format!(
                "max_add_turn_cost must be finite, got {}",
                max_add_turn_cost
            )));
        }

        let max_turn = params.extreme_turn();
        if max_turn == 0 {
            return Err(ActionSetError::invalid(format!(
                "degenerate radius-theta fan: extreme turn is 0 deg (n_branches = {}, theta = {})",
                params.n_branches(),
                params.theta()
            )));
        }
        if params.is_even() {
            warn!(
                n_branches = params.n_branches(),
                "even branch count has no straight-ahead branch"
            );
        }

        let distance = params.dist() as f64 / thresholds.node.xy;
        let mut actions = BTreeMap::new();
        for (i, turn) in params.turn_angles().into_iter().enumerate() {
            let turn_penalty = (max_add_turn_cost * turn as f64 / max_turn as f64).abs();
            let motion = RadiusThetaMove::new(distance, turn);
            actions.insert(i, Action::new(motion, distance + turn_penalty)?);
        }

        debug!(
            dist = params.dist(),
            theta = params.theta(),
            n_branches = params.n_branches(),
            max_turn,
            "built radius-theta action set"
        );
        ActionSet::new(Some(thresholds), actions)
    }
}

impl ActionSetBuilder for RadiusThetaActionSetBuilder {
    type Move = RadiusThetaMove;

    fn build(
        &self,
        supplier: &mut dyn ParameterSupplier,
    ) -> ActionSetResult<ActionSet<RadiusThetaMove>> {
        let params = RadiusThetaParams::request(supplier)?;
        self.build_with_params(&params)
    }
}
