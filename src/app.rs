//! Application module: the `App` model and the `Command` table it executes.
//!
//! `App` owns the playlist, the playback session and the transport; the UI and
//! runtime only read it and dispatch commands.

mod model;

pub use model::*;
