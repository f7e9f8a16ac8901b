//! Action Set Generation Module
//!
//! An action set is the finite catalog of moves a graph-search planner may
//! apply when it expands a node. Each action pairs a move primitive with the
//! edge cost the planner adds when taking it.
//!
//! # Components
//!
//! - `discrete`: 4- or 8-connected grid moves with Euclidean cost
//! - `radius_theta`: symmetric fan of turn angles at a fixed travel distance
//! - `differential_drive`: left/right wheel speed combinations
//! - `parameter`: suppliers of validated run-time parameters
//!
//! # Example
//!
//! ```no_run
//! use action_set_generator::path_planning::action_set::{
//!     FixedParameterSupplier, RadiusThetaActionSetBuilder,
//! };
//! use action_set_generator::common::ActionSetBuilder;
//!
//! let builder = RadiusThetaActionSetBuilder::with_defaults();
//! let mut supplier = FixedParameterSupplier::new();
//! let action_set = builder.build(&mut supplier).unwrap();
//! assert_eq!(action_set.len(), 5);
//! ```

pub mod discrete;
pub mod radius_theta;
pub mod differential_drive;
pub mod parameter;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::error::{ActionSetError, ActionSetResult};
use crate::common::traits::MotionPrimitive;
use crate::common::types::{ConvergenceThresholds, Threshold};

// Re-exports
pub use discrete::{DiscreteActionSetBuilder, DiscreteConfig, GridDirection, GridMove};
pub use radius_theta::{
    RadiusThetaActionSetBuilder, RadiusThetaConfig, RadiusThetaMove, RadiusThetaParams,
};
pub use differential_drive::{
    DifferentialDriveActionSetBuilder, DifferentialDriveConfig, WheelSpeedMove,
};
pub use parameter::{ConsoleParameterSupplier, FixedParameterSupplier};

/// Kinematic model an action set was generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveType {
    Discrete,
    RadiusTheta,
    DifferentialDrive,
}

/// A single move primitive and its traversal cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action<M> {
    #[serde(rename = "move")]
    motion: M,
    cost: f64,
}

impl<M> Action<M> {
    /// Create an action, rejecting negative or non-finite costs
    pub fn new(motion: M, cost: f64) -> ActionSetResult<Self> {
        check_cost(cost)?;
        Ok(Self { motion, cost })
    }

    pub fn motion(&self) -> &M {
        &self.motion
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }
}

fn check_cost(cost: f64) -> ActionSetResult<()> {
    if cost.is_finite() && cost >= 0.0 {
        Ok(())
    } else {
        Err(ActionSetError::invalid(format!(
            "action cost must be finite and non-negative, got {}",
            cost
        )))
    }
}

/// Immutable catalog of actions for one move type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "M: Serialize, M::Id: Serialize",
    deserialize = "M: Deserialize<'de>, M::Id: Deserialize<'de>"
))]
pub struct ActionSet<M: MotionPrimitive> {
    move_type: MoveType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    node_threshold: Option<Threshold>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    goal_threshold: Option<Threshold>,
    actions: BTreeMap<M::Id, Action<M>>,
}

impl<M: MotionPrimitive> ActionSet<M> {
    pub(crate) fn new(
        thresholds: Option<ConvergenceThresholds>,
        actions: BTreeMap<M::Id, Action<M>>,
    ) -> ActionSetResult<Self> {
        let action_set = Self {
            move_type: M::MOVE_TYPE,
            node_threshold: thresholds.map(|t| t.node),
            goal_threshold: thresholds.map(|t| t.goal),
            actions,
        };
        action_set.validate()?;
        Ok(action_set)
    }

    pub fn move_type(&self) -> MoveType {
        self.move_type
    }

    pub fn node_threshold(&self) -> Option<Threshold> {
        self.node_threshold
    }

    pub fn goal_threshold(&self) -> Option<Threshold> {
        self.goal_threshold
    }

    pub fn actions(&self) -> &BTreeMap<M::Id, Action<M>> {
        &self.actions
    }

    pub fn get(&self, id: &M::Id) -> Option<&Action<M>> {
        self.actions.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&M::Id, &Action<M>)> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Check the invariants that hold for every action set
    pub fn validate(&self) -> ActionSetResult<()> {
        if self.move_type != M::MOVE_TYPE {
            return Err(ActionSetError::invalid(format!(
                "move type {:?} does not match {:?} actions",
                self.move_type,
                M::MOVE_TYPE
            )));
        }
        if self.node_threshold.is_some() != self.goal_threshold.is_some() {
            return Err(ActionSetError::invalid(
                "node and goal thresholds must be given together",
            ));
        }
        if let Some(threshold) = &self.node_threshold {
            threshold.validate("node")?;
        }
        if let Some(threshold) = &self.goal_threshold {
            threshold.validate("goal")?;
        }
        for action in self.actions.values() {
            check_cost(action.cost)?;
        }
        let ids: Vec<&M::Id> = self.actions.keys().collect();
        M::check_set(&ids, self.node_threshold.is_some())
    }
}

/// Fail unless threshold presence matches what the move type requires
pub(crate) fn check_threshold_presence(
    move_type: MoveType,
    required: bool,
    present: bool,
) -> ActionSetResult<()> {
    match (required, present) {
        (true, false) => Err(ActionSetError::invalid(format!(
            "{:?} action sets need node and goal thresholds",
            move_type
        ))),
        (false, true) => Err(ActionSetError::invalid(format!(
            "{:?} action sets do not carry thresholds",
            move_type
        ))),
        _ => Ok(()),
    }
}

/// Fail unless the ids of an indexed set are exactly `0..n`
pub(crate) fn check_contiguous_ids(move_type: MoveType, ids: &[&usize]) -> ActionSetResult<()> {
    for (expected, &&id) in ids.iter().enumerate() {
        if id != expected {
            return Err(ActionSetError::invalid(format!(
                "{:?} action ids must run 0..{}, found {} at position {}",
                move_type,
                ids.len(),
                id,
                expected
            )));
        }
    }
    Ok(())
}

#[derive(Deserialize)]
struct MoveTypeTag {
    move_type: MoveType,
}

/// Action set whose move type is only known at run time
#[derive(Debug, Clone, PartialEq)]
pub enum AnyActionSet {
    Discrete(ActionSet<GridMove>),
    RadiusTheta(ActionSet<RadiusThetaMove>),
    DifferentialDrive(ActionSet<WheelSpeedMove>),
}

impl AnyActionSet {
    pub fn move_type(&self) -> MoveType {
        match self {
            AnyActionSet::Discrete(_) => MoveType::Discrete,
            AnyActionSet::RadiusTheta(_) => MoveType::RadiusTheta,
            AnyActionSet::DifferentialDrive(_) => MoveType::DifferentialDrive,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AnyActionSet::Discrete(s) => s.len(),
            AnyActionSet::RadiusTheta(s) => s.len(),
            AnyActionSet::DifferentialDrive(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize to pretty-printed JSON tagged with `move_type`
    pub fn to_json(&self) -> ActionSetResult<String> {
        let json = match self {
            AnyActionSet::Discrete(s) => serde_json::to_string_pretty(s)?,
            AnyActionSet::RadiusTheta(s) => serde_json::to_string_pretty(s)?,
            AnyActionSet::DifferentialDrive(s) => serde_json::to_string_pretty(s)?,
        };
        Ok(json)
    }

    /// Load an action set from JSON, dispatching on its `move_type` tag
    pub fn from_json(json: &str) -> ActionSetResult<Self> {
        let tag: MoveTypeTag = serde_json::from_str(json)?;
        let action_set = match tag.move_type {
            MoveType::Discrete => AnyActionSet::Discrete(serde_json::from_str(json)?),
            MoveType::RadiusTheta => AnyActionSet::RadiusTheta(serde_json::from_str(json)?),
            MoveType::DifferentialDrive => {
                AnyActionSet::DifferentialDrive(serde_json::from_str(json)?)
            }
        };
        action_set.validate()?;
        Ok(action_set)
    }

    pub fn validate(&self) -> ActionSetResult<()> {
        match self {
            AnyActionSet::Discrete(s) => s.validate(),
            AnyActionSet::RadiusTheta(s) => s.validate(),
            AnyActionSet::DifferentialDrive(s) => s.validate(),
        }
    }
}

impl From<ActionSet<GridMove>> for AnyActionSet {
    fn from(action_set: ActionSet<GridMove>) -> Self {
        AnyActionSet::Discrete(action_set)
    }
}

impl From<ActionSet<RadiusThetaMove>> for AnyActionSet {
    fn from(action_set: ActionSet<RadiusThetaMove>) -> Self {
        AnyActionSet::RadiusTheta(action_set)
    }
}

impl From<ActionSet<WheelSpeedMove>> for AnyActionSet {
    fn from(action_set: ActionSet<WheelSpeedMove>) -> Self {
        AnyActionSet::DifferentialDrive(action_set)
    }
}
