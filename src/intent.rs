//! Command interpretation
//!
//! Maps one transcribed utterance to an [`Intent`] by substring containment
//! against a fixed, ordered list of keyword groups. The first group with a
//! hit decides; declaration order is the priority order. The table is the
//! whole policy: no scoring, no fuzzy matching.

/// Classified meaning of one utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Fetch a random character
    Random,
    /// Fetch the character with this ID
    SelectById(u64),
    /// Save the selected character's portrait to disk
    SaveImage,
    /// Open the selected character's portrait in the default viewer
    ShowImage,
    /// Report the portrait's pixel dimensions
    Resolution,
    /// Report the selected character's first episode
    FirstEpisode,
    /// Stop the assistant
    Quit,
    /// No rule matched
    Unrecognized,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Random,
    SelectById,
    SaveImage,
    ShowImage,
    Resolution,
    FirstEpisode,
    Quit,
}

/// Keyword groups in priority order
const RULES: &[(&[&str], Action)] = &[
    (&["случайный"], Action::Random),
    (
        &["персонаж номер", "загрузи персонажа", "выбери персонажа"],
        Action::SelectById,
    ),
    (&["сохранить", "сохрани"], Action::SaveImage),
    (&["показать", "покажи"], Action::ShowImage),
    (&["разрешение"], Action::Resolution),
    (&["эпизод"], Action::FirstEpisode),
    (&["стоп", "выход", "пока"], Action::Quit),
];

/// Numbers the recognizer habitually spells out instead of transcribing
/// as digits. A workaround for unreliable number transcription, not a
/// spoken-numeral parser.
const LEXICAL_NUMBERS: &[(&str, &str)] = &[("сто восемь", "108")];

/// Classify one utterance
///
/// Microphone transcripts arrive lowercase already; typed input may not,
/// so the text is lowercased here before matching. A selection keyword
/// with no extractable number falls through to the remaining rules.
#[must_use]
pub fn interpret(utterance: &str) -> Intent {
    let command = utterance.to_lowercase();

    for (keywords, action) in RULES {
        if !keywords.iter().any(|k| command.contains(k)) {
            continue;
        }
        return match action {
            Action::Random => Intent::Random,
            Action::SelectById => match extract_number(&command) {
                // Digit strings too large for u64 saturate and then fail
                // the ordinary range check downstream.
                Some(digits) => Intent::SelectById(digits.parse().unwrap_or(u64::MAX)),
                None => continue,
            },
            Action::SaveImage => Intent::SaveImage,
            Action::ShowImage => Intent::ShowImage,
            Action::Resolution => Intent::Resolution,
            Action::FirstEpisode => Intent::FirstEpisode,
            Action::Quit => Intent::Quit,
        };
    }

    Intent::Unrecognized
}

/// Pull a character number out of an utterance
///
/// Returns the first whitespace-separated token composed entirely of
/// ASCII digits, falling back to the lexical table for spoken forms the
/// recognizer refuses to write as digits.
#[must_use]
pub fn extract_number(utterance: &str) -> Option<String> {
    if let Some(token) = utterance
        .split_whitespace()
        .find(|t| t.chars().all(|c| c.is_ascii_digit()))
    {
        return Some(token.to_string());
    }

    LEXICAL_NUMBERS
        .iter()
        .find(|(spoken, _)| utterance.contains(spoken))
        .map(|(_, digits)| (*digits).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_keyword_group() {
        assert_eq!(interpret("дай случайный персонаж"), Intent::Random);
        assert_eq!(interpret("персонаж номер 42"), Intent::SelectById(42));
        assert_eq!(interpret("сохрани картинку"), Intent::SaveImage);
        assert_eq!(interpret("покажи его"), Intent::ShowImage);
        assert_eq!(interpret("какое разрешение"), Intent::Resolution);
        assert_eq!(interpret("первый эпизод"), Intent::FirstEpisode);
        assert_eq!(interpret("стоп"), Intent::Quit);
        assert_eq!(interpret("что-то невнятное"), Intent::Unrecognized);
    }

    #[test]
    fn first_matching_rule_wins() {
        // "случайный" outranks the selection keywords, selection outranks save
        assert_eq!(interpret("случайный персонаж номер 5"), Intent::Random);
        assert_eq!(
            interpret("сохрани персонаж номер 5"),
            Intent::SelectById(5)
        );
    }

    #[test]
    fn selection_without_number_is_not_a_selection() {
        assert_eq!(interpret("персонаж номер"), Intent::Unrecognized);
        assert_eq!(interpret("загрузи персонажа пожалуйста"), Intent::Unrecognized);
    }

    #[test]
    fn uppercase_input_is_normalized() {
        assert_eq!(interpret("СТОП"), Intent::Quit);
    }

    #[test]
    fn oversized_numbers_saturate() {
        assert_eq!(
            interpret("персонаж номер 99999999999999999999999"),
            Intent::SelectById(u64::MAX)
        );
    }

    #[test]
    fn empty_utterance_is_unrecognized() {
        assert_eq!(interpret(""), Intent::Unrecognized);
    }

    #[test]
    fn extracts_first_digit_token() {
        assert_eq!(extract_number("номер 42 или 43"), Some("42".to_string()));
        assert_eq!(extract_number("42,"), None); // punctuation glues to the token
    }

    #[test]
    fn falls_back_to_lexical_table() {
        assert_eq!(
            extract_number("персонаж номер сто восемь"),
            Some("108".to_string())
        );
        assert_eq!(extract_number("персонаж номер"), None);
    }
}
