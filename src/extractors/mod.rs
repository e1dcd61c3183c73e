pub mod filter;
pub mod path;

pub use filter::{Filter, FromQueryPairs};
pub use path::{ChildIds, IdParams, ResourceId};
