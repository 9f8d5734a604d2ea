use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wubba::voice::{ConsoleSpeaker, LineListener, Listener, Speaker};
use wubba::{Assistant, CharacterClient, Config};

/// Wubba - voice assistant for the Rick and Morty character API
#[derive(Parser)]
#[command(name = "wubba", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Read commands from stdin instead of the microphone
    #[arg(long)]
    text: bool,

    /// Path to the Vosk model directory
    #[arg(long, env = "WUBBA_MODEL_PATH")]
    model: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List installed TTS voices
    Voices,
    /// Speak one line and exit
    TestTts {
        /// Text to speak
        #[arg(default_value = "Я здесь. Проверка синтеза речи.")]
        text: String,
    },
    /// Show a microphone level meter
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,wubba=info",
        1 => "info,wubba=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Handle subcommands
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Voices => cmd_voices(),
            Command::TestTts { text } => cmd_test_tts(&text, cli.config.as_deref()),
            Command::TestMic { duration } => cmd_test_mic(duration),
        };
    }

    let mut config = Config::load(cli.config.as_deref());
    if let Some(model) = cli.model {
        config.model_path = model;
    }
    tracing::debug!(?config, "loaded configuration");

    let client = CharacterClient::new(&config.api).context("failed to create API client")?;
    let (speaker, listener) = build_io(&config, cli.text)?;

    tracing::info!(text_mode = cli.text, "wubba ready");

    let mut assistant = Assistant::new(config, Box::new(client), speaker, listener);
    assistant.run();

    Ok(())
}

/// Build the speaker/listener pair for the selected mode
#[cfg(feature = "voice")]
fn build_io(config: &Config, text: bool) -> anyhow::Result<(Box<dyn Speaker>, Box<dyn Listener>)> {
    use wubba::voice::{TtsSpeaker, VoskListener, install_interrupt_handler};

    if text {
        return Ok((Box::new(ConsoleSpeaker), Box::new(LineListener::new())));
    }

    install_interrupt_handler().context("failed to install interrupt handler")?;

    // Recognition first: a missing model must stop startup before any audio
    // device is touched for output
    let listener = VoskListener::new(&config.model_path).context("speech recognition unavailable")?;
    let speaker = TtsSpeaker::new(&config.speech).context("speech synthesis unavailable")?;

    Ok((Box::new(speaker), Box::new(listener)))
}

#[cfg(not(feature = "voice"))]
fn build_io(_config: &Config, text: bool) -> anyhow::Result<(Box<dyn Speaker>, Box<dyn Listener>)> {
    if !text {
        anyhow::bail!("voice support not built in; run with --text or rebuild with `--features voice`");
    }
    Ok((Box::new(ConsoleSpeaker), Box::new(LineListener::new())))
}

/// List installed TTS voices
#[cfg(feature = "voice")]
fn cmd_voices() -> anyhow::Result<()> {
    let engine = tts::Tts::default()?;
    let voices = engine.voices()?;

    if voices.is_empty() {
        println!("No voices installed.");
        return Ok(());
    }

    println!("Installed voices:");
    for voice in voices {
        println!("  {} ({})", voice.name(), voice.language());
    }

    Ok(())
}

/// Speak one line and exit
#[cfg(feature = "voice")]
fn cmd_test_tts(text: &str, config_path: Option<&Path>) -> anyhow::Result<()> {
    use wubba::voice::TtsSpeaker;

    println!("Testing TTS with text: \"{text}\"\n");

    let config = Config::load(config_path);
    let mut speaker = TtsSpeaker::new(&config.speech)?;
    speaker.speak(text)?;

    println!("\n---");
    println!("If you heard the speech, TTS is working!");

    Ok(())
}

/// Show a microphone level meter
#[cfg(feature = "voice")]
fn cmd_test_mic(duration: u64) -> anyhow::Result<()> {
    use std::time::{Duration, Instant};

    use wubba::voice::AudioCapture;

    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let capture = AudioCapture::new()?;
    println!("Sample rate: {} Hz", capture.sample_rate());
    println!("---");

    let stream = capture.start()?;

    for second in 1..=duration {
        let deadline = Instant::now() + Duration::from_secs(1);
        let mut samples: Vec<i16> = Vec::new();
        while Instant::now() < deadline {
            if let Some(chunk) = stream.read_chunk(Duration::from_millis(100)) {
                samples.extend_from_slice(&chunk);
            }
        }

        let energy = calculate_rms(&samples);

        // Visual meter
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 200.0).min(50.0) as usize;
        let meter: String = "█".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!("[{second:2}s] RMS: {energy:.4} | [{meter}]");
    }

    println!("\n---");
    println!("If you saw movement in the meter, your mic is working!");
    println!("If RMS stayed near 0, check:");
    println!("  1. Is your mic plugged in?");
    println!("  2. Run: pactl info | grep 'Default Source'");
    println!("  3. Run: arecord -l (to list devices)");

    Ok(())
}

/// RMS energy of i16 samples normalized to [0, 1]
#[cfg(feature = "voice")]
#[allow(clippy::cast_precision_loss)]
fn calculate_rms(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples
        .iter()
        .map(|&s| {
            let x = f32::from(s) / 32768.0;
            x * x
        })
        .sum();
    (sum_squares / samples.len() as f32).sqrt()
}

#[cfg(not(feature = "voice"))]
fn cmd_voices() -> anyhow::Result<()> {
    anyhow::bail!(NO_VOICE)
}

#[cfg(not(feature = "voice"))]
fn cmd_test_tts(_text: &str, _config_path: Option<&Path>) -> anyhow::Result<()> {
    anyhow::bail!(NO_VOICE)
}

#[cfg(not(feature = "voice"))]
fn cmd_test_mic(_duration: u64) -> anyhow::Result<()> {
    anyhow::bail!(NO_VOICE)
}

#[cfg(not(feature = "voice"))]
const NO_VOICE: &str = "voice support not built in; rebuild with `--features voice`";
