//! HTTP handlers for all web routes.

pub mod overview;
pub mod otu;
pub mod traits;
pub mod nutrients;
pub mod simulation;
pub mod about;
