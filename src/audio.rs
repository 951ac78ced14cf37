//! Audio module: the rodio-backed transport running on its own thread.
//!
//! The UI thread sends [`AudioCmd`]s through the [`Transport`] trait and drains
//! [`TransportEvent`]s stamped with the [`LoadId`] of the source they describe.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::*;
