//! Picker module: the in-terminal file/folder browser used to choose what to load.

mod browser;

pub use browser::*;

#[cfg(test)]
mod tests;
