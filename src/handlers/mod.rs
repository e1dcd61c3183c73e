//! HTTP handlers: decode and validate input, call the service, serialize the result.

pub mod classes;
pub mod entries;
pub mod spells;
pub use classes::*;
pub use entries::*;
pub use spells::*;
