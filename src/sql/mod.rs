//! Safe SQL builder: identifiers from catalog definitions only, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
