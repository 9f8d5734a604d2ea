//! Selected-character session state

use crate::api::CharacterRecord;

/// The single slot holding the most recently fetched character
///
/// Set on every successful fetch, read by every handler that needs "the
/// current character". A failed fetch leaves the previous selection in
/// place; nothing ever clears the slot.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<CharacterRecord>,
}

impl Session {
    /// Create an empty session
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Currently selected character, if any
    #[must_use]
    pub const fn current(&self) -> Option<&CharacterRecord> {
        self.current.as_ref()
    }

    /// Replace the selection wholesale
    pub fn replace(&mut self, record: CharacterRecord) {
        tracing::debug!(id = record.id, name = %record.name, "session updated");
        self.current = Some(record);
    }

    /// Whether no character is selected yet
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, name: &str) -> CharacterRecord {
        CharacterRecord {
            id,
            name: name.to_string(),
            image: None,
            episode: Vec::new(),
        }
    }

    #[test]
    fn starts_empty() {
        let session = Session::new();
        assert!(session.is_empty());
        assert!(session.current().is_none());
    }

    #[test]
    fn replace_overwrites_previous_selection() {
        let mut session = Session::new();
        session.replace(record(1, "Rick Sanchez"));
        session.replace(record(2, "Morty Smith"));

        let current = session.current().unwrap();
        assert_eq!(current.id, 2);
        assert_eq!(current.name, "Morty Smith");
    }
}
