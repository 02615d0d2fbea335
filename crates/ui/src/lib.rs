#![deny(unsafe_code)]

//! Moped desktop shell.
//!
//! A GPUI front end over `moped-chat` and `moped-voice`: a thread sidebar, the
//! active thread's messages, a staged input with voice dictation, and canned bot
//! replies delivered after a delay.
pub mod app;
pub mod chat;
/// Startup settings loaded from disk and the environment.
pub mod settings;
