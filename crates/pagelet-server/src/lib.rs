//! Server-side response shaping for plain pagelet responses.
//!
//! This crate installs the `plain` capability on pagelet classes:
//! - `DefaultRenderable` - Marks the response plain and ends it with data
//! - `ResponseShaper` - Install-if-absent registry keyed by class identity
//! - `PlainResponse` - Response stream over any byte sink

mod renderable;
mod response;
mod shaper;

pub use renderable::*;
pub use response::*;
pub use shaper::*;
