//! Common types, traits, and error definitions for action_set_generator
//!
//! This module provides the foundational building blocks shared by
//! all action set builders in this crate.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
