mod element;
mod page;

pub use element::{CanAppend, Element};
pub use page::Page;
