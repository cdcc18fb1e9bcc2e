mod error;
mod page;
mod routes;
mod serve;
mod state;

pub use error::*;
pub use page::*;
pub use routes::*;
pub use serve::*;
pub use state::*;
