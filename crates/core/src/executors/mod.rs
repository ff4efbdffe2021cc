//! Built-in [`Agent`](crate::agent::Agent) implementations.
//!
//! - [`EchoAgent`] returns its overrides, for smoke tests and demos.
//! - [`CommandAgent`] wraps an existing external program.

pub mod command;
pub mod echo;

pub use command::CommandAgent;
pub use echo::EchoAgent;
