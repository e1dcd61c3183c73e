//! Catalog entities as served to clients.

mod class;
mod entry;
mod spell;

pub use class::*;
pub use entry::*;
pub use spell::*;
