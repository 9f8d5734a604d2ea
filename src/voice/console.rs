//! Console stand-ins for the voice pipeline
//!
//! Text mode: utterances come from stdin lines and responses are printed
//! instead of synthesized. Exercises the same interpreter and handlers as
//! the microphone path.

use std::io::{BufRead, Write};

use crate::Result;
use crate::voice::{Listener, Speaker};

/// Reads utterances from stdin, one per line
pub struct LineListener {
    stdin: std::io::Stdin,
}

impl LineListener {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stdin: std::io::stdin(),
        }
    }
}

impl Default for LineListener {
    fn default() -> Self {
        Self::new()
    }
}

impl Listener for LineListener {
    fn listen(&mut self) -> Result<Option<String>> {
        let mut line = String::new();

        loop {
            print!("> ");
            std::io::stdout().flush()?;

            line.clear();
            if self.stdin.lock().read_line(&mut line)? == 0 {
                // EOF, input closed
                return Ok(None);
            }

            let utterance = line.trim().to_lowercase();
            if !utterance.is_empty() {
                return Ok(Some(utterance));
            }
        }
    }
}

/// Prints responses instead of speaking them
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSpeaker;

impl Speaker for ConsoleSpeaker {
    fn speak(&mut self, text: &str) -> Result<()> {
        println!("Ассистент: {text}");
        Ok(())
    }
}
