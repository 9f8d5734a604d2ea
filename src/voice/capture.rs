//! Microphone capture
//!
//! Opens the default input device at its native configuration and hands
//! mono i16 chunks to the recognizer over a channel. The stream lives
//! inside a [`CaptureStream`] guard and stops when the guard drops.

use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, SupportedStreamConfig};

use crate::{Error, Result};

/// Captures audio from the default input device
pub struct AudioCapture {
    device: Device,
    config: SupportedStreamConfig,
}

impl AudioCapture {
    /// Open the default input device
    ///
    /// # Errors
    ///
    /// Returns error if no input device is available or it reports no
    /// default configuration.
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device available".to_string()))?;

        let config = device
            .default_input_config()
            .map_err(|e| Error::Audio(e.to_string()))?;

        tracing::debug!(
            device = %device.name().unwrap_or_default(),
            sample_rate = config.sample_rate().0,
            channels = config.channels(),
            format = ?config.sample_format(),
            "audio capture initialized"
        );

        Ok(Self { device, config })
    }

    /// Native sample rate of the input device
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate().0
    }

    /// Start capturing
    ///
    /// # Errors
    ///
    /// Returns error if the stream cannot be built or started, or the
    /// device uses a sample format with no conversion here.
    pub fn start(&self) -> Result<CaptureStream> {
        let (tx, rx) = channel();
        let channels = usize::from(self.config.channels());
        let config = self.config.config();

        let stream = match self.config.sample_format() {
            SampleFormat::I16 => self.build_stream::<i16>(&config, channels, tx, |s| s),
            SampleFormat::U16 => self.build_stream::<u16>(&config, channels, tx, u16_to_i16),
            SampleFormat::F32 => self.build_stream::<f32>(&config, channels, tx, f32_to_i16),
            other => return Err(Error::Audio(format!("unsupported sample format: {other:?}"))),
        }
        .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;
        tracing::debug!("audio capture started");

        Ok(CaptureStream { _stream: stream, rx })
    }

    fn build_stream<T>(
        &self,
        config: &cpal::StreamConfig,
        channels: usize,
        tx: Sender<Vec<i16>>,
        convert: fn(T) -> i16,
    ) -> std::result::Result<Stream, cpal::BuildStreamError>
    where
        T: cpal::SizedSample + Send + 'static,
    {
        self.device.build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                // Downmix to mono: first sample of each frame
                let mono: Vec<i16> = data
                    .chunks(channels)
                    .map(|frame| convert(frame[0]))
                    .collect();
                let _ = tx.send(mono);
            },
            |err| {
                tracing::error!(error = %err, "audio capture error");
            },
            None,
        )
    }
}

/// Live capture stream; capture stops when this drops
pub struct CaptureStream {
    _stream: Stream,
    rx: Receiver<Vec<i16>>,
}

impl CaptureStream {
    /// Receive the next chunk of mono samples
    ///
    /// Returns `None` if nothing arrived within `timeout`. A healthy
    /// device delivers chunks continuously, silence included, so a miss
    /// means the stream has stalled.
    #[must_use]
    pub fn read_chunk(&self, timeout: Duration) -> Option<Vec<i16>> {
        match self.rx.recv_timeout(timeout) {
            Ok(chunk) => Some(chunk),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

fn u16_to_i16(s: u16) -> i16 {
    i16::try_from(i32::from(s) - 32768).unwrap_or(i16::MIN)
}

#[allow(clippy::cast_possible_truncation)]
fn f32_to_i16(s: f32) -> i16 {
    (s * 32767.0).clamp(-32768.0, 32767.0) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u16_conversion_is_centered() {
        assert_eq!(u16_to_i16(0), i16::MIN);
        assert_eq!(u16_to_i16(32768), 0);
        assert_eq!(u16_to_i16(65535), i16::MAX);
    }

    #[test]
    fn f32_conversion_clamps() {
        assert_eq!(f32_to_i16(0.0), 0);
        assert_eq!(f32_to_i16(1.5), i16::MAX);
        assert_eq!(f32_to_i16(-1.5), i16::MIN);
    }
}
