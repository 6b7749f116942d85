//! Utility helpers: the object arena, logging, profiling, and math extensions.

pub mod allocator;
pub mod logging;
pub mod math;
pub mod profiling;

pub use allocator::{Arena, ObjectId};
pub use math::*;
