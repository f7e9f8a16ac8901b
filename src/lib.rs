//! ActionSetGenerator - move primitives for graph-search path planners
//!
//! This crate enumerates the candidate moves, and their traversal costs,
//! that a planner applies when expanding a state. Three kinematic models
//! are provided: discrete grid motion, radius-theta (turn then travel)
//! motion, and differential-drive wheel speeds.

// Core modules
pub mod common;

// Algorithm modules
pub mod path_planning;

// Re-export common types for convenience
pub use common::{Point2D, Pose2D, ControlInput, Threshold, ConvergenceThresholds};
pub use common::{ActionSetBuilder, MotionPrimitive, ParameterSupplier};
pub use common::{ActionSetError, ActionSetResult};
pub use path_planning::action_set::{Action, ActionSet, AnyActionSet, MoveType};
