//! Differential drive action set
//!
//! Each action is a pair of wheel speeds drawn from `[0, rpm_left, rpm_right]`.
//! Costs are left at zero; the planner's motion model derives them from the
//! resulting trajectory.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use itertools::iproduct;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::error::{ActionSetError, ActionSetResult};
use crate::common::traits::{ActionSetBuilder, MotionPrimitive, ParameterSupplier};
use crate::common::types::{ControlInput, ConvergenceThresholds, ParameterKind};

use super::{check_contiguous_ids, check_threshold_presence, Action, ActionSet, MoveType};

pub const RPM_DEFAULT: (u32, u32) = (5, 10);

/// Size of the `[0, left, right]` squared product
const WHEEL_SPEED_ACTIONS: usize = 9;

/// Left and right wheel speeds [rpm]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelSpeedMove {
    pub left_rpm: u32,
    pub right_rpm: u32,
}

impl WheelSpeedMove {
    pub fn new(left_rpm: u32, right_rpm: u32) -> Self {
        Self { left_rpm, right_rpm }
    }

    /// Body velocities produced by these wheel speeds
    ///
    /// # Arguments
    /// * `wheel_radius` - Wheel radius [m]
    /// * `wheel_separation` - Distance between the wheels [m]
    pub fn to_control_input(
        &self,
        wheel_radius: f64,
        wheel_separation: f64,
    ) -> ActionSetResult<ControlInput> {
        if !(wheel_radius > 0.0 && wheel_separation > 0.0) {
            return Err(ActionSetError::invalid(format!(
                "wheel geometry must be positive, got radius {} and separation {}",
                wheel_radius, wheel_separation
            )));
        }
        let omega_l = rpm_to_rad_per_sec(self.left_rpm);
        let omega_r = rpm_to_rad_per_sec(self.right_rpm);
        let v = wheel_radius * (omega_l + omega_r) / 2.0;
        let omega = wheel_radius * (omega_r - omega_l) / wheel_separation;
        Ok(ControlInput::new(v, omega))
    }
}

fn rpm_to_rad_per_sec(rpm: u32) -> f64 {
    f64::from(rpm) * 2.0 * PI / 60.0
}

impl MotionPrimitive for WheelSpeedMove {
    type Id = usize;
    const MOVE_TYPE: MoveType = MoveType::DifferentialDrive;

    fn check_set(ids: &[&usize], has_thresholds: bool) -> ActionSetResult<()> {
        check_threshold_presence(Self::MOVE_TYPE, true, has_thresholds)?;
        if ids.len() != WHEEL_SPEED_ACTIONS {
            return Err(ActionSetError::invalid(format!(
                "differential drive action sets hold {} actions, got {}",
                WHEEL_SPEED_ACTIONS,
                ids.len()
            )));
        }
        check_contiguous_ids(Self::MOVE_TYPE, ids)
    }
}

/// Configuration for the differential drive action set
#[derive(Debug, Clone, Default)]
pub struct DifferentialDriveConfig {
    /// Tolerances passed through to the planner
    pub thresholds: ConvergenceThresholds,
}

/// Builds wheel-speed action sets
#[derive(Debug, Clone)]
pub struct DifferentialDriveActionSetBuilder {
    config: DifferentialDriveConfig,
}

impl DifferentialDriveActionSetBuilder {
    pub fn new(config: DifferentialDriveConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(DifferentialDriveConfig::default())
    }

    pub fn config(&self) -> &DifferentialDriveConfig {
        &self.config
    }

    /// Generate the 3x3 wheel speed product, ids in row-major order (left outer)
    pub fn build_with_rpm(&self, rpm: (u32, u32)) -> ActionSetResult<ActionSet<WheelSpeedMove>> {
        let thresholds = self.config.thresholds;
        thresholds.validate()?;

        let candidates = [0, rpm.0, rpm.1];
        let mut actions = BTreeMap::new();
        for (id, (&left, &right)) in iproduct!(candidates.iter(), candidates.iter()).enumerate() {
            actions.insert(id, Action::new(WheelSpeedMove::new(left, right), 0.0)?);
        }

        debug!(rpm_left = rpm.0, rpm_right = rpm.1, "built differential drive action set");
        ActionSet::new(Some(thresholds), actions)
    }
}

impl ActionSetBuilder for DifferentialDriveActionSetBuilder {
    type Move = WheelSpeedMove;

    fn build(
        &self,
        supplier: &mut dyn ParameterSupplier,
    ) -> ActionSetResult<ActionSet<WheelSpeedMove>> {
        let rpm = supplier.request_pair(ParameterKind::WheelRpm, RPM_DEFAULT)?;
        self.build_with_rpm(rpm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::Threshold;
    use crate::path_planning::action_set::FixedParameterSupplier;

    #[test]
    fn test_default_rpm_product() {
        let action_set = DifferentialDriveActionSetBuilder::with_defaults()
            .build(&mut FixedParameterSupplier::new())
            .unwrap();

        assert_eq!(action_set.len(), 9);
        assert_eq!(action_set.move_type(), MoveType::DifferentialDrive);
        assert_eq!(action_set.get(&0).unwrap().motion(), &WheelSpeedMove::new(0, 0));
        assert_eq!(action_set.get(&4).unwrap().motion(), &WheelSpeedMove::new(5, 5));
        assert_eq!(action_set.get(&8).unwrap().motion(), &WheelSpeedMove::new(10, 10));
        for (_, action) in action_set.iter() {
            assert_eq!(action.cost(), 0.0);
        }
    }

    #[test]
    fn test_ids_follow_row_major_order() {
        let action_set = DifferentialDriveActionSetBuilder::with_defaults()
            .build_with_rpm((5, 10))
            .unwrap();
        let speeds = [0, 5, 10];
        let mut expected = Vec::new();
        for &left in speeds.iter() {
            for &right in speeds.iter() {
                expected.push(WheelSpeedMove::new(left, right));
            }
        }
        let moves: Vec<WheelSpeedMove> = action_set.iter().map(|(_, a)| *a.motion()).collect();
        assert_eq!(moves, expected);
    }

    #[test]
    fn test_duplicate_speeds_keep_nine_actions() {
        let action_set = DifferentialDriveActionSetBuilder::with_defaults()
            .build_with_rpm((0, 0))
            .unwrap();
        assert_eq!(action_set.len(), 9);
        assert!(action_set.iter().all(|(_, a)| *a.motion() == WheelSpeedMove::new(0, 0)));
    }

    #[test]
    fn test_thresholds_pass_through() {
        let thresholds =
            ConvergenceThresholds::new(Threshold::new(0.25, 15.0), Threshold::new(2.0, 45.0));
        let config = DifferentialDriveConfig { thresholds };
        let action_set = DifferentialDriveActionSetBuilder::new(config)
            .build_with_rpm((45, 50))
            .unwrap();
        assert_eq!(action_set.node_threshold(), Some(thresholds.node));
        assert_eq!(action_set.goal_threshold(), Some(thresholds.goal));
    }

    #[test]
    fn test_supplier_pair_used() {
        let mut supplier =
            FixedParameterSupplier::new().with_pair(ParameterKind::WheelRpm, (50, 100));
        let action_set = DifferentialDriveActionSetBuilder::with_defaults()
            .build(&mut supplier)
            .unwrap();
        assert_eq!(action_set.get(&5).unwrap().motion(), &WheelSpeedMove::new(50, 100));
    }

    #[test]
    fn test_control_input() {
        // 60 rpm is one revolution per second
        let straight = WheelSpeedMove::new(60, 60).to_control_input(0.1, 0.5).unwrap();
        assert!((straight.v - 0.2 * PI).abs() < 1e-10);
        assert!(straight.omega.abs() < 1e-10);

        let spin = WheelSpeedMove::new(0, 60).to_control_input(0.1, 0.5).unwrap();
        assert!((spin.omega - 0.4 * PI).abs() < 1e-10);

        assert!(WheelSpeedMove::new(5, 10).to_control_input(0.0, 0.5).is_err());
    }
}
