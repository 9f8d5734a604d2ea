//! The assistant
//!
//! Startup sequence, the listen/interpret/dispatch loop, and the command
//! handlers. Handlers report every outcome out loud and never abort the
//! loop; only a quit command or closed input ends a run.

use crate::Error;
use crate::api::{CharacterRecord, CharacterSource};
use crate::config::Config;
use crate::images;
use crate::intent::{Intent, interpret};
use crate::session::Session;
use crate::voice::{Listener, Speaker};

/// Character preloaded during startup
const STARTUP_CHARACTER_ID: u32 = 108;

/// Spoken when a handler needs a selection and none exists
const SELECT_FIRST: &str =
    "Сначала выберите персонажа командой 'случайный' или 'персонаж номер'.";

/// Spoken for unrecognized utterances
const HELP: &str = "Команда не распознана. Попробуйте: случайный, сохранить, показать, \
                    разрешение, эпизод, персонаж номер и число, или стоп.";

/// Spoken before each listen
const LISTENING: &str = "Слушаю вашу команду...";

/// Spoken once after startup
const GREETING: &str = "Голосовой ассистент Рик и Морти активирован. Какие будут указания?";

/// Spoken on shutdown
const FAREWELL: &str = "Завершаю работу. До новых встреч во вселенной Рика и Морти!";

/// Whether the command loop keeps going after a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Owns the session and the I/O seams; one instance per process
pub struct Assistant {
    config: Config,
    session: Session,
    client: Box<dyn CharacterSource>,
    speaker: Box<dyn Speaker>,
    listener: Box<dyn Listener>,
}

impl Assistant {
    /// Assemble an assistant from its parts
    #[must_use]
    pub fn new(
        config: Config,
        client: Box<dyn CharacterSource>,
        speaker: Box<dyn Speaker>,
        listener: Box<dyn Listener>,
    ) -> Self {
        Self {
            config,
            session: Session::new(),
            client,
            speaker,
            listener,
        }
    }

    /// Currently selected character, if any
    #[must_use]
    pub fn current_character(&self) -> Option<&CharacterRecord> {
        self.session.current()
    }

    /// Run the command loop until a quit command or closed input
    pub fn run(&mut self) {
        self.startup();

        loop {
            self.say(LISTENING);

            let utterance = match self.listener.listen() {
                Ok(Some(utterance)) => utterance,
                Ok(None) => {
                    tracing::info!("input closed, shutting down");
                    self.say(FAREWELL);
                    return;
                }
                Err(Error::Interrupted) => {
                    tracing::info!("listening interrupted");
                    continue;
                }
                Err(e) => {
                    tracing::error!(error = %e, "listening failed");
                    continue;
                }
            };

            tracing::info!(utterance = %utterance, "utterance received");
            let intent = interpret(&utterance);
            tracing::debug!(?intent, "dispatching");

            if self.dispatch(intent) == LoopState::Stopped {
                return;
            }
        }
    }

    /// Preload a known character, then greet
    fn startup(&mut self) {
        self.say(&format!(
            "Загружаю данные для персонажа номер {STARTUP_CHARACTER_ID}."
        ));

        match self.client.fetch(Some(STARTUP_CHARACTER_ID)) {
            Ok(record) => {
                let name = record.name.clone();
                self.session.replace(record);
                self.say(&format!("Персонаж {name} загружен. Готов к командам."));
            }
            Err(e) => {
                tracing::warn!(error = %e, id = STARTUP_CHARACTER_ID, "startup preload failed");
                self.say(&format!(
                    "Не удалось загрузить данные для персонажа {STARTUP_CHARACTER_ID}. \
                     Ассистент готов к другим командам."
                ));
            }
        }

        self.say(GREETING);
    }

    /// Route one intent to its handler
    pub fn dispatch(&mut self, intent: Intent) -> LoopState {
        match intent {
            Intent::Random => self.handle_random(),
            Intent::SelectById(id) => self.handle_select(id),
            Intent::SaveImage => self.handle_save_image(),
            Intent::ShowImage => self.handle_show_image(),
            Intent::Resolution => self.handle_resolution(),
            Intent::FirstEpisode => self.handle_first_episode(),
            Intent::Unrecognized => self.say(HELP),
            Intent::Quit => {
                self.say(FAREWELL);
                return LoopState::Stopped;
            }
        }

        LoopState::Running
    }

    fn handle_random(&mut self) {
        self.say("Ищу случайного персонажа...");

        match self.client.fetch(None) {
            Ok(record) => {
                let name = record.name.clone();
                self.session.replace(record);
                self.say(&format!("Найден персонаж: {name}."));
            }
            Err(e) => {
                self.say(&fetch_error_message(&e));
                self.say("Не удалось получить данные о случайном персонаже.");
            }
        }
    }

    fn handle_select(&mut self, id: u64) {
        let max = self.config.api.max_character_id;

        // Range check before any network traffic; oversized spoken numbers
        // land here via u64::MAX
        let id = match u32::try_from(id) {
            Ok(id) if (1..=max).contains(&id) => id,
            _ => {
                self.say(&format!(
                    "Неверный номер персонажа. Пожалуйста, укажите номер от 1 до {max}."
                ));
                return;
            }
        };

        self.say(&format!("Загружаю данные о персонаже с номером {id}..."));

        match self.client.fetch(Some(id)) {
            Ok(record) => {
                let name = record.name.clone();
                self.session.replace(record);
                self.say(&format!("Персонаж {name} загружен."));
            }
            Err(e) => self.say(&fetch_error_message(&e)),
        }
    }

    fn handle_save_image(&mut self) {
        let Some(record) = self.session.current() else {
            self.say(SELECT_FIRST);
            return;
        };
        let name = record.name.clone();
        let Some(image_url) = record.image.clone() else {
            self.say("У этого персонажа нет изображения.");
            return;
        };

        match self.client.fetch_image(&image_url) {
            Ok(bytes) => match images::save_image(&self.config.images_dir, &name, &bytes) {
                Ok(path) => self.say(&format!(
                    "Изображение персонажа {name} сохранено как {}.",
                    path.display()
                )),
                Err(e) => self.say(&format!("Ошибка при сохранении файла: {e}")),
            },
            Err(e) => self.say(&format!("Ошибка при скачивании изображения: {e}")),
        }
    }

    fn handle_show_image(&mut self) {
        let Some(record) = self.session.current() else {
            self.say(SELECT_FIRST);
            return;
        };
        let name = record.name.clone();
        let Some(image_url) = record.image.clone() else {
            self.say(&format!("У персонажа {name} нет изображения."));
            return;
        };

        self.say(&format!("Пытаюсь показать изображение персонажа {name}."));

        match opener::open(&image_url) {
            Ok(()) => self.say("Изображение должно было открыться."),
            Err(e) => self.say(&format!(
                "Не удалось показать изображение: {e}. Попробуйте команду 'сохранить'."
            )),
        }
    }

    fn handle_resolution(&mut self) {
        let Some(record) = self.session.current() else {
            self.say(SELECT_FIRST);
            return;
        };
        let name = record.name.clone();
        let Some(image_url) = record.image.clone() else {
            self.say(&format!(
                "У персонажа {name} нет изображения для определения разрешения."
            ));
            return;
        };

        self.say(&format!("Определяю разрешение изображения для {name}."));

        let bytes = match self.client.fetch_image(&image_url) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.say(&format!(
                    "Ошибка при загрузке изображения для определения разрешения: {e}"
                ));
                return;
            }
        };

        match images::dimensions(&bytes) {
            Ok((width, height)) => self.say(&format!(
                "Разрешение изображения: {width} на {height} пикселей."
            )),
            Err(e) => self.say(&format!("Не удалось определить разрешение: {e}")),
        }
    }

    fn handle_first_episode(&mut self) {
        let Some(record) = self.session.current() else {
            self.say(SELECT_FIRST);
            return;
        };
        let name = record.name.clone();
        let Some(first_url) = record.episode.first().cloned() else {
            self.say(&format!(
                "Нет информации об эпизодах для персонажа {name}."
            ));
            return;
        };

        match self.client.fetch_episode(&first_url) {
            Ok(episode) => self.say(&format!(
                "Персонаж {name} впервые появился в эпизоде {}: {}.",
                episode.episode, episode.name
            )),
            Err(e) => self.say(&format!(
                "Ошибка при получении информации об эпизоде: {e}"
            )),
        }
    }

    /// Speak one line, degrading to a log entry if synthesis fails
    fn say(&mut self, text: &str) {
        if let Err(e) = self.speaker.speak(text) {
            tracing::warn!(error = %e, text, "speech output failed");
        }
    }
}

/// User-facing message for a failed character fetch
fn fetch_error_message(error: &Error) -> String {
    match error {
        Error::NotFound { id } => format!("Персонаж с ID {id} не найден."),
        Error::Api { status } => format!(
            "Ошибка API: {}. Не удалось получить данные о персонаже.",
            status.as_u16()
        ),
        other => format!("Ошибка сети: {other}. Не удалось подключиться к API."),
    }
}
