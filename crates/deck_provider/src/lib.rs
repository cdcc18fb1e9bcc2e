mod error;
mod openai;
mod provider;
mod request;
mod response;

pub use error::*;
pub use openai::OpenAiCompat;
pub use provider::ChatProvider;
pub use request::ChatCompletionRequest;
pub use response::ChatCompletionResponse;
