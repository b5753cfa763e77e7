//! Event Selection
//!
//! Picks events whose two features both fall inside an open rectangle,
//! e.g. a light output band and a shape parameter band on a PSD plot.

mod error;
mod selector;

pub use error::SelectionError;
pub use selector::{find_in_range, RegionSelector, SelectionBox};
