//! Interactive terminal: prompts, pauses and screen clearing.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use cardo_core::error::DomainError;
use cardo_game::application::input::RoundInput;
use cardo_game::domain::roles::Role;
use cardo_game::domain::round::{InputRejection, Offer};
use colored::Colorize;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use dialoguer::Input;

use crate::render;

/// The player-facing terminal.
#[derive(Debug)]
pub struct Console {
    pause: Duration,
    round: u32,
    rounds_total: u32,
}

impl Console {
    /// Creates a console that waits `pause` before clearing the screen.
    #[must_use]
    pub fn new(pause: Duration) -> Self {
        Self {
            pause,
            round: 0,
            rounds_total: 0,
        }
    }

    /// Sets the round shown in turn headings.
    pub fn begin_round(&mut self, round: u32, rounds_total: u32) {
        self.round = round;
        self.rounds_total = rounds_total;
    }

    /// Prints lines to stdout.
    pub fn say<I, S>(&self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            println!("{}", line.as_ref());
        }
    }

    /// Clears the terminal and homes the cursor.
    ///
    /// # Errors
    ///
    /// Returns the terminal's I/O error.
    pub fn clear(&self) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        stdout.flush()
    }

    /// Reads one line, allowing it to be empty.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Input` if the terminal cannot be read.
    pub fn ask(&self, prompt: &str) -> Result<String, DomainError> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .report(false)
            .interact_text()
            .map_err(|e| DomainError::Input(e.to_string()))
    }

    /// Blocks until Enter is pressed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Input` if the terminal cannot be read.
    pub fn wait_for_enter(&self) -> Result<(), DomainError> {
        self.ask(&format!("Press {} to continue", "Enter".bold()))
            .map(|_| ())
    }

    fn turn(&mut self, player: &str, role: Role, offer: &Offer) -> Result<String, DomainError> {
        self.clear()
            .map_err(|e| DomainError::Input(e.to_string()))?;
        self.say([
            render::turn_heading(self.round, self.rounds_total, player, role),
            String::new(),
        ]);
        self.say(render::offer_lines(offer));
        println!();
        let prompt = match role {
            Role::Cardoelector => "Your pick (1-3)",
            Role::Cardomante => "Your guess (1-3)",
        };
        self.ask(prompt)
    }
}

impl RoundInput for Console {
    fn choose(&mut self, cardoelector: &str, offer: &Offer) -> Result<String, DomainError> {
        self.turn(cardoelector, Role::Cardoelector, offer)
    }

    fn guess(&mut self, cardomante: &str, offer: &Offer) -> Result<String, DomainError> {
        self.turn(cardomante, Role::Cardomante, offer)
    }

    fn rejected(&mut self, _player: &str, _role: Role, rejection: &InputRejection) {
        println!("{}", rejection.to_string().red());
        thread::sleep(self.pause);
    }

    fn accepted(&mut self, _player: &str, _role: Role) {
        thread::sleep(self.pause);
    }
}
