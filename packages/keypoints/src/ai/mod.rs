//! Model-backed implementations of the AI traits.
//!
//! The adapters require the `openai` feature; the retry helper they share
//! is always available.

pub mod retry;

#[cfg(feature = "openai")]
pub mod minicheck;
#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "openai")]
pub use minicheck::MiniCheckVerifier;
#[cfg(feature = "openai")]
pub use openai::OpenAiGenerator;
pub use retry::with_retry;
