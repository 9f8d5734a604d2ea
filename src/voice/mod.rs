//! Voice I/O
//!
//! The assistant talks through two seams: [`Listener`] (one transcribed
//! utterance at a time) and [`Speaker`] (one spoken line at a time).
//! Native capture, recognition and synthesis live behind the `voice`
//! feature; the console implementations are always available and back
//! text mode and the test suite.

mod console;

#[cfg(feature = "voice")]
mod capture;
#[cfg(feature = "voice")]
mod stt;
#[cfg(feature = "voice")]
mod tts;

pub use console::{ConsoleSpeaker, LineListener};

#[cfg(feature = "voice")]
pub use capture::{AudioCapture, CaptureStream};
#[cfg(feature = "voice")]
pub use stt::{VoskListener, install_interrupt_handler};
#[cfg(feature = "voice")]
pub use tts::TtsSpeaker;

use crate::Result;

/// Produces transcribed utterances
pub trait Listener {
    /// Block until one utterance is available
    ///
    /// `Ok(Some(text))` carries one lowercase utterance. `Ok(None)` means
    /// the input source is closed and the loop should wind down.
    ///
    /// # Errors
    ///
    /// Transient capture or recognition failures, including a manual
    /// interrupt, come back as errors; the caller logs and retries.
    fn listen(&mut self) -> Result<Option<String>>;
}

/// Speaks responses to the user
///
/// Every spoken line is also mirrored as a text line; speech plus that
/// mirror are the program's only user-facing output.
pub trait Speaker {
    /// Say one line, blocking until playback finishes
    ///
    /// # Errors
    ///
    /// Returns error if synthesis or playback fails.
    fn speak(&mut self, text: &str) -> Result<()>;
}
