//! Completion-service clients for Helmsman.
//!
//! The orchestration loop talks to any backend through the
//! `CompletionClient` trait from `helmsman-core`; this crate implements it
//! for OpenAI-compatible chat-completion endpoints, which covers the vast
//! majority of hosted and local providers (Groq, OpenAI, OpenRouter,
//! Ollama, vLLM).

pub mod openai_compat;

pub use openai_compat::OpenAiCompatClient;
