mod agent;
pub mod credential;
mod error;
mod form;
mod prompt;
mod render;
mod schema_loader;
mod session;
mod store;

pub use agent::*;
pub use error::*;
pub use form::*;
pub use prompt::*;
pub use render::*;
pub use schema_loader::*;
pub use session::*;
pub use store::*;
