//! Playback control: the controller state machine and the media element
//! abstraction it drives.
//!
//! The controller never renders and never touches audio hardware directly;
//! it only talks to a [`MediaElement`], so it can be exercised in tests
//! with a fake element.

mod controller;
mod element;
mod queue;
mod types;

pub use controller::*;
pub use element::*;
pub use queue::Queue;
pub use types::*;

#[cfg(test)]
pub(crate) mod fake;
