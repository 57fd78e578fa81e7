//! # Helmsman Core
//!
//! Domain types, traits, and error definitions for the Helmsman agent
//! orchestration runtime. This crate has **zero framework dependencies**;
//! it defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is defined as a trait here: the completion
//! service, built-in tools, remote tool providers, and the approval gate.
//! Implementations live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod approval;
pub mod completion;
pub mod error;
pub mod event;
pub mod message;
pub mod remote;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use approval::{ApprovalGate, AutoApprove, DenyAll};
pub use completion::{CompletionClient, CompletionRequest, CompletionResponse, Usage};
pub use error::{CompletionError, DispatchError, Error, Result, ToolError};
pub use event::{AgentEvent, EventBus};
pub use message::{Message, Role, ToolCallRequest};
pub use remote::{ContentBlock, RemoteContent, RemoteToolOutput, RemoteToolProvider};
pub use tool::{Tool, ToolDescriptor, ToolRegistry, ToolResultEnvelope};
