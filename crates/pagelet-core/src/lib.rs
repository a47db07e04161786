//! Core abstractions for asynchronous pagelet fetching.
//!
//! This crate provides the types both halves of the plugin agree on:
//! - `FragmentClass` / `Fragment` - Pagelet templates and live instances
//! - `Renderable` - The `plain` capability installed on a class
//! - `EventBus` - Host hook registration and pub/sub
//! - `RequestDescriptor` / `Response` - Transport wire types
//! - `FetchPhase` - Per-call fetch lifecycle tracking

mod bus;
mod config;
mod error;
mod fragment;
mod lifecycle;
mod stream;
mod wire;

pub use bus::*;
pub use config::*;
pub use error::*;
pub use fragment::*;
pub use lifecycle::*;
pub use stream::*;
pub use wire::*;
