//! Common traits defining interfaces for action set generation

use std::fmt::Debug;

use crate::common::error::ActionSetResult;
use crate::common::types::{IntBounds, ParameterKind};
use crate::path_planning::action_set::{ActionSet, MoveType};

/// A move primitive stored in an action set
pub trait MotionPrimitive: Debug + Clone + PartialEq {
    /// Key identifying an action within its set
    type Id: Debug + Clone + Ord;

    /// Tag shared by every action set of this move type
    const MOVE_TYPE: MoveType;

    /// Check the size and id layout of a whole set, and whether it carries
    /// convergence thresholds
    fn check_set(ids: &[&Self::Id], has_thresholds: bool) -> ActionSetResult<()>;
}

/// Source of validated scalar and pair parameters for the builders
///
/// Implementations never hand back a value outside the requested bounds.
/// Retrying on bad input, if any, happens inside the supplier.
pub trait ParameterSupplier {
    /// Request a single integer within `bounds`, falling back to `default`
    fn request_int(
        &mut self,
        kind: ParameterKind,
        default: i64,
        bounds: IntBounds,
    ) -> ActionSetResult<i64>;

    /// Request a pair of non-negative integers, falling back to `default`
    fn request_pair(
        &mut self,
        kind: ParameterKind,
        default: (u32, u32),
    ) -> ActionSetResult<(u32, u32)>;
}

/// Trait for action set generators
pub trait ActionSetBuilder {
    /// Move type produced by this builder
    type Move: MotionPrimitive;

    /// Build the action set, pulling any run-time parameters from `supplier`
    fn build(&self, supplier: &mut dyn ParameterSupplier) -> ActionSetResult<ActionSet<Self::Move>>;
}
