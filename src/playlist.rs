//! Playlist module: the ordered queue, active index and sort key.

mod model;

pub use model::*;
