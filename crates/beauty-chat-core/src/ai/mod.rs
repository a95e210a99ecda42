pub mod completion;

pub use completion::{extract_reply, CompletionClient, HttpCompletionClient};
