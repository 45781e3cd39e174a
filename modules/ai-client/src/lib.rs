pub mod claude;
pub mod error;
pub mod openai;
pub mod openrouter;
pub mod provider;
pub mod traits;
pub mod util;

pub use claude::Claude;
pub use error::AiError;
pub use openai::{AzureOpenAi, OpenAi};
pub use openrouter::OpenRouter;
pub use provider::{Credentials, LlmProvider};
pub use traits::{Message, MessageRole, Prompt, TextGenerator};
pub use util::{strip_code_blocks, truncate_to_char_boundary, truncate_words};
