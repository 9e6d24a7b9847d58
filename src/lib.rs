//! Physbot is a terminal chatbot that answers physics questions through
//! Google's Gemini API.
//!
//! The crate is organized around a small set of layers:
//! - [`core`] owns conversation state: the seeded transcript, the replay
//!   engine that turns each question into a request, and configuration.
//! - [`api`] defines the [`api::ChatModel`] seam and the Gemini client.
//! - [`ui`] runs the line-oriented chat loop and renders the conversation.
//! - [`commands`] implements slash-command parsing and execution.
//!
//! The binary routes through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod logging;
pub mod ui;
pub mod utils;
