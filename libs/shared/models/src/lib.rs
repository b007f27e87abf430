pub mod auth;
pub mod error;
pub mod page;

pub use auth::*;
pub use error::*;
pub use page::*;
