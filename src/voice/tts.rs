//! Speech synthesis
//!
//! Wraps the system TTS engine, preferring an installed voice that matches
//! the configured language. Playback blocks until the engine goes idle so
//! speech never overlaps the next listen.

use std::thread;
use std::time::Duration;

use tts::{Tts, Voice};

use crate::config::SpeechConfig;
use crate::voice::Speaker;
use crate::{Error, Result};

/// Poll interval while waiting for the engine to finish a line
const SPEAK_POLL: Duration = Duration::from_millis(50);

/// Speaks through the system TTS engine
pub struct TtsSpeaker {
    engine: Tts,
    can_poll: bool,
}

impl TtsSpeaker {
    /// Initialize the engine and pick a voice
    ///
    /// Voice preference: first installed voice whose primary language
    /// matches the configured language, otherwise one whose name contains
    /// a configured preferred name, otherwise the engine default (with a
    /// warning).
    ///
    /// # Errors
    ///
    /// Returns error if the engine cannot be initialized.
    pub fn new(config: &SpeechConfig) -> Result<Self> {
        let mut engine = Tts::default().map_err(|e| Error::Tts(e.to_string()))?;

        match select_voice(&engine, config) {
            Ok(Some(voice)) => {
                tracing::info!(voice = %voice.name(), language = %voice.language(), "voice selected");
                engine
                    .set_voice(&voice)
                    .map_err(|e| Error::Tts(e.to_string()))?;
            }
            Ok(None) => {
                tracing::warn!(
                    language = %config.language,
                    "no matching voice installed, using engine default"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "voice enumeration failed, using engine default");
            }
        }

        if engine.supported_features().rate {
            let rate = (engine.normal_rate() * config.rate_scale)
                .clamp(engine.min_rate(), engine.max_rate());
            engine
                .set_rate(rate)
                .map_err(|e| Error::Tts(e.to_string()))?;
        }

        let can_poll = engine.supported_features().is_speaking;
        Ok(Self { engine, can_poll })
    }
}

/// Scan installed voices for a language match, then a name match
fn select_voice(engine: &Tts, config: &SpeechConfig) -> Result<Option<Voice>> {
    if !engine.supported_features().voice {
        return Ok(None);
    }

    let voices = engine.voices().map_err(|e| Error::Tts(e.to_string()))?;

    if let Some(voice) = voices.iter().find(|v| {
        v.language()
            .primary_language()
            .eq_ignore_ascii_case(&config.language)
    }) {
        return Ok(Some(voice.clone()));
    }

    Ok(voices
        .iter()
        .find(|v| {
            let name = v.name().to_lowercase();
            config
                .preferred_voices
                .iter()
                .any(|preferred| name.contains(&preferred.to_lowercase()))
        })
        .cloned())
}

impl Speaker for TtsSpeaker {
    fn speak(&mut self, text: &str) -> Result<()> {
        println!("Ассистент: {text}");
        tracing::debug!(text, "speaking");

        self.engine
            .speak(text, false)
            .map_err(|e| Error::Tts(e.to_string()))?;

        if self.can_poll {
            while self
                .engine
                .is_speaking()
                .map_err(|e| Error::Tts(e.to_string()))?
            {
                thread::sleep(SPEAK_POLL);
            }
        }

        Ok(())
    }
}
