//! datachat: a conversational backend that routes user messages to an
//! LLM completion endpoint, detects visualization requests, executes
//! model-emitted plotting code in a bounded subprocess, and serves the
//! resulting artifacts alongside the text reply.

pub mod cli;
pub mod config;
pub mod exec;
pub mod extract;
pub mod ingest;
pub mod intent;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod server;
