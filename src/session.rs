//! Session module: playback state of the loaded track, mediated through the transport.

mod model;

pub use model::*;
