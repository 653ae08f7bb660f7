pub mod ai_service;
pub mod completion;
pub mod error;
pub mod location;
pub mod prompts;
pub mod weather;

pub use ai_service::AiService;
pub use error::AiError;
