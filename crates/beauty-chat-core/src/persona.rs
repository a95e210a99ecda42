//! Fixed texts for the L'Oréal beauty assistant persona.

/// Model identifier sent with every completion request.
pub const MODEL: &str = "gpt-4o";

pub const SYSTEM_PROMPT: &str = "You are L'Oréal Beauty Assistant, a helpful expert on L'Oréal products, routines, and beauty recommendations. Only answer questions related to L'Oréal, beauty, skincare, haircare, or makeup. If asked about anything else, politely refuse and explain you only answer L'Oréal beauty-related questions.";

/// Shown once when the chat opens. Display only, never sent to the endpoint.
pub const GREETING: &str = "👋 Hello! How can I help you today?";

pub const BRAND_ANSWER: &str = "L'Oréal is a world-leading beauty company from France, known for innovative skincare, haircare, makeup, and fragrance products. L'Oréal is dedicated to making beauty accessible to everyone, with a commitment to quality, safety, and sustainability.";

pub const REFUSAL: &str = "I'm here to help with questions about L'Oréal products, beauty routines, skincare, haircare, and makeup. Please ask something related to L'Oréal or beauty!";

pub const NO_RESPONSE_FALLBACK: &str = "Sorry, I couldn't get a response. Please try again.";

pub const CONNECTION_FALLBACK: &str = "Sorry, there was a problem connecting. Please try again.";

pub const PLACEHOLDER: &str = "Thinking...";

pub const USER_AVATAR: &str = "You";
pub const AI_AVATAR: &str = "L";

/// Text of the "highlighted last question" slot.
pub fn highlight_text(question: &str) -> String {
    format!("You asked: \"{}\"", question)
}
