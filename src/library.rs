//! Generated tracks on disk: the `Track` model, probing, and filename allocation.

mod model;
mod scan;

pub use model::Track;
pub use scan::{next_track_name, probe};

#[cfg(test)]
mod tests;
