pub mod ai;
pub mod config;
pub mod error;
pub mod normalize;
pub mod persona;
pub mod relevance;
pub mod session;
pub mod state;

// Re-export main types for convenience
pub use ai::{CompletionClient, HttpCompletionClient};
pub use config::Config;
pub use error::{ChatError, TransportError};
pub use normalize::{is_brand_query, normalize};
pub use relevance::is_relevant;
pub use session::{ChatSession, RenderSink, Sender, Submission};
pub use state::{Conversation, Message, Role};
