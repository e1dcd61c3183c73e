pub mod catalog;
pub mod settings;
pub mod validator;

pub use catalog::*;
pub use settings::*;
pub use validator::validate;
