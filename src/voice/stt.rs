//! Speech recognition
//!
//! Feeds microphone chunks into a local Vosk model and returns one
//! utterance per listen call. The model loads once at construction; each
//! call opens its own capture stream and drops it on every exit path.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use vosk::{DecodingState, Model, Recognizer};

use crate::voice::{AudioCapture, Listener};
use crate::{Error, Result};

/// How long to wait for one audio chunk
const CHUNK_TIMEOUT: Duration = Duration::from_millis(500);

/// Consecutive chunk misses before the stream counts as dead (~10s)
const STALL_LIMIT: u32 = 20;

/// Set by the Ctrl-C handler, consumed by the listen loop
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Install the Ctrl-C handler
///
/// The first interrupt aborts the listen in progress; a second one exits
/// the process, since handlers block on synchronous calls that cannot be
/// cancelled.
///
/// # Errors
///
/// Returns error if a handler is already installed.
pub fn install_interrupt_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        if INTERRUPTED.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
    })
    .map_err(|e| Error::Audio(format!("failed to install interrupt handler: {e}")))
}

/// Listens on the microphone and transcribes with a local Vosk model
pub struct VoskListener {
    capture: AudioCapture,
    #[allow(dead_code)]
    model: Model,
    recognizer: Recognizer,
}

impl VoskListener {
    /// Load the model and prepare a recognizer at the device sample rate
    ///
    /// # Errors
    ///
    /// Returns error if the model directory is missing or unreadable, or
    /// no input device is available.
    pub fn new(model_path: &Path) -> Result<Self> {
        if !model_path.is_dir() {
            return Err(Error::Recognition(format!(
                "speech model not found at '{}'; download a model from \
                 https://alphacephei.com/vosk/models and unpack it there",
                model_path.display()
            )));
        }

        let capture = AudioCapture::new()?;

        let model = Model::new(model_path.to_string_lossy()).ok_or_else(|| {
            Error::Recognition(format!(
                "failed to load speech model from '{}'",
                model_path.display()
            ))
        })?;

        #[allow(clippy::cast_precision_loss)]
        let mut recognizer = Recognizer::new(&model, capture.sample_rate() as f32)
            .ok_or_else(|| Error::Recognition("failed to create recognizer".to_string()))?;
        recognizer.set_max_alternatives(0);
        recognizer.set_words(false);

        tracing::info!(
            model = %model_path.display(),
            sample_rate = capture.sample_rate(),
            "speech recognition ready"
        );

        Ok(Self {
            capture,
            model,
            recognizer,
        })
    }
}

impl Listener for VoskListener {
    fn listen(&mut self) -> Result<Option<String>> {
        // Clear any audio state left over from an aborted listen
        self.recognizer.reset();

        let stream = self.capture.start()?;
        tracing::debug!("listening");

        let mut stalled = 0u32;
        loop {
            if INTERRUPTED.swap(false, Ordering::SeqCst) {
                return Err(Error::Interrupted);
            }

            let Some(chunk) = stream.read_chunk(CHUNK_TIMEOUT) else {
                stalled += 1;
                if stalled >= STALL_LIMIT {
                    return Err(Error::Audio("microphone stream stalled".to_string()));
                }
                continue;
            };
            stalled = 0;

            let state = self
                .recognizer
                .accept_waveform(&chunk)
                .map_err(|e| Error::Recognition(e.to_string()))?;

            match state {
                DecodingState::Finalized => {
                    if let Some(result) = self.recognizer.result().single() {
                        let text = result.text.trim().to_lowercase();
                        if !text.is_empty() {
                            tracing::info!(transcript = %text, "transcription complete");
                            return Ok(Some(text));
                        }
                    }
                    // Finalized on silence, keep listening
                }
                DecodingState::Failed => {
                    return Err(Error::Recognition(
                        "recognizer failed to process audio".to_string(),
                    ));
                }
                DecodingState::Running => {}
            }
        }
    }
}
