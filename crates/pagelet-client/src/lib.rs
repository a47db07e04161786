//! Asynchronous pagelet fetch helpers and response classification.
//!
//! This crate provides the client half of the xhr plugin:
//! - `XhrClient` - Per-pagelet GET/POST/PUT/DELETE operations
//! - `RequestBody` - Raw, structured or empty request payloads
//! - `Transport` - The HTTP collaborator
//! - `Renderer` / `RenderCompletion` - Render pipeline hand-off
//! - `ResponseClassifier` - Plain passthrough vs. render-then-notify

mod classifier;
mod render;
mod request;
mod transport;
mod xhr;

pub use classifier::*;
pub use render::*;
pub use request::*;
pub use transport::*;
pub use xhr::*;
