//! Configuration
//!
//! Built-in defaults, overlaid by an optional `wubba.toml` (working
//! directory first, then the user config directory), overlaid by
//! environment variables.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default relative path of the Vosk model directory
const DEFAULT_MODEL_PATH: &str = "vosk-model-small-ru-0.22";

/// Default directory character images are saved into
const DEFAULT_IMAGES_DIR: &str = "images";

/// Default character API endpoint
const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api/character";

/// Highest character ID the public API serves
const DEFAULT_MAX_CHARACTER_ID: u32 = 826;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default voice language (primary subtag)
const DEFAULT_LANGUAGE: &str = "ru";

/// Default speaking rate as a fraction of the engine's normal rate
const DEFAULT_RATE_SCALE: f32 = 0.75;

/// Assistant configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the Vosk model directory (`WUBBA_MODEL_PATH` env)
    pub model_path: PathBuf,

    /// Directory character images are saved into (`WUBBA_IMAGES_DIR` env)
    pub images_dir: PathBuf,

    /// Character API settings
    pub api: ApiConfig,

    /// Speech synthesis settings
    pub speech: SpeechConfig,
}

/// Character API settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; a character ID is appended as the final path segment
    /// (`WUBBA_API_BASE_URL` env)
    pub base_url: String,

    /// Highest valid character ID
    pub max_character_id: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Speech synthesis settings
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// Preferred voice language as a primary subtag, e.g. "ru"
    pub language: String,

    /// Voice names to fall back to when no language match exists
    pub preferred_voices: Vec<String>,

    /// Speaking rate as a fraction of the engine's normal rate
    pub rate_scale: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            api: ApiConfig::default(),
            speech: SpeechConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_character_id: DEFAULT_MAX_CHARACTER_ID,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            preferred_voices: vec!["aleksandr".to_string(), "irina".to_string()],
            rate_scale: DEFAULT_RATE_SCALE,
        }
    }
}

impl Config {
    /// Load configuration: defaults, then config file, then environment.
    ///
    /// `explicit` replaces the usual file search; a missing or malformed
    /// file logs a warning and leaves the defaults in place.
    #[must_use]
    pub fn load(explicit: Option<&Path>) -> Self {
        let mut config = Self::merge(load_config_file(explicit));

        if let Ok(path) = std::env::var("WUBBA_MODEL_PATH") {
            config.model_path = PathBuf::from(path);
        }
        if let Ok(dir) = std::env::var("WUBBA_IMAGES_DIR") {
            config.images_dir = PathBuf::from(dir);
        }
        if let Ok(url) = std::env::var("WUBBA_API_BASE_URL") {
            config.api.base_url = url;
        }

        config
    }

    /// Overlay file values on the defaults
    fn merge(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(path) = file.model_path {
            config.model_path = path;
        }
        if let Some(dir) = file.images_dir {
            config.images_dir = dir;
        }
        if let Some(url) = file.api.base_url {
            config.api.base_url = url;
        }
        if let Some(max) = file.api.max_character_id {
            config.api.max_character_id = max;
        }
        if let Some(secs) = file.api.timeout_secs {
            config.api.timeout_secs = secs;
        }
        if let Some(language) = file.speech.language {
            config.speech.language = language;
        }
        if let Some(voices) = file.speech.preferred_voices {
            config.speech.preferred_voices = voices;
        }
        if let Some(scale) = file.speech.rate_scale {
            config.speech.rate_scale = scale;
        }

        config
    }
}

/// `wubba.toml` schema; every field optional, a partial overlay
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    model_path: Option<PathBuf>,
    images_dir: Option<PathBuf>,
    #[serde(default)]
    api: ApiFile,
    #[serde(default)]
    speech: SpeechFile,
}

#[derive(Debug, Default, Deserialize)]
struct ApiFile {
    base_url: Option<String>,
    max_character_id: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct SpeechFile {
    language: Option<String>,
    preferred_voices: Option<Vec<String>>,
    rate_scale: Option<f32>,
}

/// Read the TOML overlay, falling back to defaults on any problem
fn load_config_file(explicit: Option<&Path>) -> ConfigFile {
    let Some(path) = explicit.map(Path::to_path_buf).or_else(config_file_path) else {
        return ConfigFile::default();
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                ConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read config file");
            ConfigFile::default()
        }
    }
}

/// First existing config file: `./wubba.toml`, then `<config dir>/wubba/config.toml`
fn config_file_path() -> Option<PathBuf> {
    let local = PathBuf::from("wubba.toml");
    if local.exists() {
        return Some(local);
    }

    directories::BaseDirs::new()
        .map(|dirs| dirs.config_dir().join("wubba").join("config.toml"))
        .filter(|path| path.exists())
}
