//! Command interpretation integration tests
//!
//! Exercises the keyword table and number extraction over realistic
//! transcripts.

use wubba::{Intent, extract_number, interpret};

#[test]
fn keywords_match_anywhere_in_the_utterance() {
    assert_eq!(interpret("случайный"), Intent::Random);
    assert_eq!(interpret("дай мне случайный персонаж"), Intent::Random);
    assert_eq!(interpret("а ну ка случайный давай"), Intent::Random);
}

#[test]
fn selection_requires_an_extractable_number() {
    assert_eq!(interpret("персонаж номер 5"), Intent::SelectById(5));
    assert_eq!(interpret("загрузи персонажа 826"), Intent::SelectById(826));
    assert_eq!(
        interpret("выбери персонажа номер 12 пожалуйста"),
        Intent::SelectById(12)
    );

    // selection keyword, no number: falls through the rest of the table
    assert_eq!(interpret("персонаж номер"), Intent::Unrecognized);
    assert_eq!(interpret("выбери персонажа"), Intent::Unrecognized);
}

#[test]
fn priority_is_declaration_order() {
    // random outranks selection
    assert_eq!(interpret("случайный персонаж номер 3"), Intent::Random);
    // selection outranks save
    assert_eq!(interpret("сохрани персонаж номер 3"), Intent::SelectById(3));
    // save outranks show
    assert_eq!(interpret("сохрани и покажи"), Intent::SaveImage);
    // show outranks resolution
    assert_eq!(interpret("покажи разрешение"), Intent::ShowImage);
}

#[test]
fn quit_keywords() {
    assert_eq!(interpret("стоп"), Intent::Quit);
    assert_eq!(interpret("выход"), Intent::Quit);
    assert_eq!(interpret("ну всё пока"), Intent::Quit);
}

#[test]
fn show_outranks_quit_despite_shared_prefix() {
    // "покажи" contains "пока"; the show rule fires first
    assert_eq!(interpret("покажи"), Intent::ShowImage);
    assert_eq!(interpret("покажи изображение"), Intent::ShowImage);
}

#[test]
fn typed_input_is_case_normalized() {
    assert_eq!(interpret("СТОП"), Intent::Quit);
    assert_eq!(interpret("Случайный"), Intent::Random);
    assert_eq!(interpret("Персонаж Номер 8"), Intent::SelectById(8));
}

#[test]
fn unmatched_utterances_are_unrecognized() {
    assert_eq!(interpret(""), Intent::Unrecognized);
    assert_eq!(interpret("привет"), Intent::Unrecognized);
    assert_eq!(interpret("что ты умеешь"), Intent::Unrecognized);
    assert_eq!(interpret("налей чаю"), Intent::Unrecognized);
}

#[test]
fn oversized_spoken_numbers_never_panic() {
    // saturates and gets refused by the range check downstream
    assert_eq!(
        interpret("персонаж номер 99999999999999999999999999"),
        Intent::SelectById(u64::MAX)
    );
}

// --- Number extraction ---

#[test]
fn first_all_digit_token_wins() {
    assert_eq!(extract_number("номер 42 или 43").as_deref(), Some("42"));
    assert_eq!(extract_number("дай 7").as_deref(), Some("7"));
}

#[test]
fn tokens_with_punctuation_do_not_count() {
    assert_eq!(extract_number("номер 42,"), None);
    assert_eq!(extract_number("номер s01e05"), None);
}

#[test]
fn lexical_fallback_covers_misheard_numbers() {
    assert_eq!(
        extract_number("персонаж номер сто восемь").as_deref(),
        Some("108")
    );
}

#[test]
fn digits_outrank_the_lexical_table() {
    assert_eq!(
        extract_number("сто восемь нет лучше 5").as_deref(),
        Some("5")
    );
}

#[test]
fn nothing_extractable_yields_none() {
    assert_eq!(extract_number("персонаж номер"), None);
    assert_eq!(extract_number(""), None);
}
