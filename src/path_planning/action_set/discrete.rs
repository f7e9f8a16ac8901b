//! Discrete grid action set
//!
//! Moves a fixed amount in the 4 cardinal directions, plus the 4 diagonals
//! when enabled. Uses screen coordinates: `up` decreases y.

use std::collections::BTreeMap;
use std::f64::consts::SQRT_2;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::error::{ActionSetError, ActionSetResult};
use crate::common::traits::{ActionSetBuilder, MotionPrimitive, ParameterSupplier};
use crate::common::types::Point2D;

use super::{check_threshold_presence, Action, ActionSet, MoveType};

/// Compass direction of a grid move, also the action id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridDirection {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl GridDirection {
    pub const ALL: [GridDirection; 8] = [
        GridDirection::Up,
        GridDirection::UpRight,
        GridDirection::Right,
        GridDirection::DownRight,
        GridDirection::Down,
        GridDirection::DownLeft,
        GridDirection::Left,
        GridDirection::UpLeft,
    ];

    pub const CARDINAL: [GridDirection; 4] = [
        GridDirection::Up,
        GridDirection::Right,
        GridDirection::Down,
        GridDirection::Left,
    ];

    /// Unit step (dx, dy) in screen coordinates
    pub fn unit_delta(self) -> (i32, i32) {
        match self {
            GridDirection::Up => (0, -1),
            GridDirection::UpRight => (1, -1),
            GridDirection::Right => (1, 0),
            GridDirection::DownRight => (1, 1),
            GridDirection::Down => (0, 1),
            GridDirection::DownLeft => (-1, 1),
            GridDirection::Left => (-1, 0),
            GridDirection::UpLeft => (-1, -1),
        }
    }

    pub fn is_diagonal(self) -> bool {
        let (dx, dy) = self.unit_delta();
        dx != 0 && dy != 0
    }
}

/// Grid displacement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMove {
    pub dx: f64,
    pub dy: f64,
}

impl GridMove {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Position reached by applying this move at `from`
    pub fn apply(&self, from: Point2D) -> Point2D {
        Point2D::from(from.to_vector() + Point2D::new(self.dx, self.dy).to_vector())
    }

    pub fn length(&self) -> f64 {
        Point2D::new(self.dx, self.dy).to_vector().norm()
    }
}

impl MotionPrimitive for GridMove {
    type Id = GridDirection;
    const MOVE_TYPE: MoveType = MoveType::Discrete;

    fn check_set(ids: &[&GridDirection], has_thresholds: bool) -> ActionSetResult<()> {
        check_threshold_presence(Self::MOVE_TYPE, false, has_thresholds)?;
        let expected: &[GridDirection] = match ids.len() {
            4 => &GridDirection::CARDINAL,
            8 => &GridDirection::ALL,
            n => {
                return Err(ActionSetError::invalid(format!(
                    "discrete action sets hold 4 or 8 actions, got {}",
                    n
                )))
            }
        };
        if !ids.iter().copied().eq(expected.iter()) {
            return Err(ActionSetError::invalid(format!(
                "discrete action ids {:?} do not form a 4- or 8-connected set",
                ids
            )));
        }
        Ok(())
    }
}

/// Configuration for the discrete action set
#[derive(Debug, Clone)]
pub struct DiscreteConfig {
    /// Include the 4 diagonal moves
    pub diagonal: bool,
    /// Step length along each axis
    pub move_amt: f64,
}

impl Default for DiscreteConfig {
    fn default() -> Self {
        Self {
            diagonal: true,
            move_amt: 1.0,
        }
    }
}

/// Builds 4- or 8-connected grid action sets
#[derive(Debug, Clone)]
pub struct DiscreteActionSetBuilder {
    config: DiscreteConfig,
}

impl DiscreteActionSetBuilder {
    pub fn new(config: DiscreteConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(DiscreteConfig::default())
    }

    pub fn config(&self) -> &DiscreteConfig {
        &self.config
    }

    /// Generate the action set; needs no run-time parameters
    pub fn build_action_set(&self) -> ActionSetResult<ActionSet<GridMove>> {
        let move_amt = self.config.move_amt;
        if !(move_amt.is_finite() && move_amt > 0.0) {
            return Err(ActionSetError::invalid(format!(
                "move_amt must be positive, got {}",
                move_amt
            )));
        }

        let directions: &[GridDirection] = if self.config.diagonal {
            &GridDirection::ALL
        } else {
            &GridDirection::CARDINAL
        };

        let mut actions = BTreeMap::new();
        for &direction in directions {
            let (ux, uy) = direction.unit_delta();
            let motion = GridMove::new(f64::from(ux) * move_amt, f64::from(uy) * move_amt);
            let cost = if direction.is_diagonal() {
                move_amt * SQRT_2
            } else {
                move_amt
            };
            actions.insert(direction, Action::new(motion, cost)?);
        }

        debug!(
            diagonal = self.config.diagonal,
            move_amt,
            actions = actions.len(),
            "built discrete action set"
        );
        ActionSet::new(None, actions)
    }
}

impl ActionSetBuilder for DiscreteActionSetBuilder {
    type Move = GridMove;

    fn build(&self, _supplier: &mut dyn ParameterSupplier) -> ActionSetResult<ActionSet<GridMove>> {
        self.build_action_set()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(diagonal: bool, move_amt: f64) -> ActionSetResult<ActionSet<GridMove>> {
        DiscreteActionSetBuilder::new(DiscreteConfig { diagonal, move_amt }).build_action_set()
    }

    #[test]
    fn test_diagonal_set_has_eight_actions() {
        let action_set = build(true, 1.0).unwrap();
        assert_eq!(action_set.len(), 8);
        assert_eq!(action_set.move_type(), MoveType::Discrete);
        assert!(action_set.node_threshold().is_none());
        assert!(action_set.goal_threshold().is_none());

        for (direction, action) in action_set.iter() {
            if direction.is_diagonal() {
                assert!((action.cost() - 2.0_f64.sqrt()).abs() < 1e-10);
            } else {
                assert!((action.cost() - 1.0).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_cardinal_set_has_four_actions() {
        let action_set = build(false, 2.0).unwrap();
        assert_eq!(action_set.len(), 4);
        for direction in GridDirection::CARDINAL.iter() {
            let action = action_set.get(direction).unwrap();
            assert!((action.cost() - 2.0).abs() < 1e-10);
        }
        assert!(action_set.get(&GridDirection::UpRight).is_none());
    }

    #[test]
    fn test_move_deltas_use_screen_coordinates() {
        let action_set = build(true, 3.0).unwrap();
        let motion = |direction| *action_set.get(&direction).unwrap().motion();
        assert_eq!(motion(GridDirection::Up), GridMove::new(0.0, -3.0));
        assert_eq!(motion(GridDirection::Right), GridMove::new(3.0, 0.0));
        assert_eq!(
            action_set.get(&GridDirection::DownLeft).unwrap().motion(),
            &GridMove::new(-3.0, 3.0)
        );
    }

    #[test]
    fn test_cost_matches_move_length() {
        let action_set = build(true, 0.25).unwrap();
        for (_, action) in action_set.iter() {
            assert!((action.cost() - action.motion().length()).abs() < 1e-10);
        }
    }

    #[test]
    fn test_non_positive_move_amt_rejected() {
        assert!(matches!(build(true, 0.0), Err(ActionSetError::InvalidConfiguration(_))));
        assert!(matches!(build(false, -1.0), Err(ActionSetError::InvalidConfiguration(_))));
        assert!(build(true, f64::INFINITY).is_err());
    }

    #[test]
    fn test_grid_move_apply() {
        let next = GridMove::new(1.0, -1.0).apply(Point2D::new(2.0, 2.0));
        assert_eq!(next, Point2D::new(3.0, 1.0));
    }
}
