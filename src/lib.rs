//! Wubba - voice assistant for the Rick and Morty character API
//!
//! This library provides the core functionality for the assistant:
//! - Speech recognition against a local Vosk model
//! - Command interpretation over an ordered keyword table
//! - Character lookups (random or by number) with a single-slot session
//! - Spoken responses, mirrored to the console
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                     Input                            │
//! │        Microphone (vosk)  │  stdin (--text)          │
//! └────────────────────┬────────────────────────────────┘
//!                      │ utterance
//! ┌────────────────────▼────────────────────────────────┐
//! │              Interpreter + Dispatch                  │
//! │   keyword rules  │  session slot  │  handlers        │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                   Outputs                            │
//! │  character API  │  images/  │  viewer  │  TTS        │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod assistant;
pub mod config;
pub mod error;
pub mod images;
pub mod intent;
pub mod session;
pub mod voice;

pub use api::{CharacterClient, CharacterRecord, CharacterSource, EpisodeRecord};
pub use assistant::{Assistant, LoopState};
pub use config::{ApiConfig, Config, SpeechConfig};
pub use error::{Error, Result};
pub use intent::{Intent, extract_number, interpret};
pub use session::Session;
