// Path planning support modules

pub mod action_set;

pub use action_set::*;
