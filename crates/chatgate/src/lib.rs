//! Chatgate - a stateless gateway that speaks one chat API in front of many LLM backends.

// ============================================================================
// Always Available
// ============================================================================

pub mod config;
pub mod llm;
pub mod prompt;

// ============================================================================
// Server-only (behind `server` feature)
// ============================================================================

#[cfg(feature = "server")]
pub mod handlers;
#[cfg(feature = "server")]
pub mod response;
#[cfg(feature = "server")]
pub mod server;
