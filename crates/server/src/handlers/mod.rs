//! HTTP request handlers.

pub mod common;
pub mod exercises;
pub mod health;
pub mod routines;
pub mod series;

pub use common::*;
pub use exercises::*;
pub use health::*;
pub use routines::*;
pub use series::*;
