mod error;
mod settings;

pub use error::*;
pub use settings::*;
