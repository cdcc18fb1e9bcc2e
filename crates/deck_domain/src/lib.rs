mod error;
mod history;
mod input;
mod message;
mod reply;
mod schema;
mod session_id;
mod transcript;
mod values;

pub use error::*;
pub use history::*;
pub use input::*;
pub use message::*;
pub use reply::*;
pub use schema::*;
pub use session_id::*;
pub use transcript::*;
pub use values::*;
