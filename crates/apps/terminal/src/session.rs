//! Line-oriented terminal session: transcript, the fixed command set, and the snake game it can
//! hand the keyboard to.

use std::rc::Rc;

use platform_host::EntropySource;

use crate::snake::{Direction, GridSize, SnakeGame, TickOutcome};

/// Prompt echoed in front of every submitted line.
pub const PROMPT: &str = "user@ubuntu:~$";
/// Output of `ls`.
pub const LS_OUTPUT: &str = "Desktop Documents Downloads Music Pictures Public Templates Videos";
/// Output of `whoami`.
pub const WHOAMI_OUTPUT: &str = "user";
/// Output of `pwd`.
pub const PWD_OUTPUT: &str = "/home/user";
/// Output of `help`.
pub const HELP_OUTPUT: &str = "Available commands: ls, whoami, pwd, clear, help, echo, snake";
/// Control hint printed when a game starts.
pub const SNAKE_START_HINT: &str = "Starting snake — use arrow keys (or ZQSD)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What a submitted line did to the session.
pub enum SubmitOutcome {
    /// Blank line, or the input is disabled by a running game.
    Ignored,
    /// Command ran and its output (if any) was appended.
    Executed,
    /// `snake` started a game; the caller now owns the tick timer and key routing.
    GameStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How a key press was consumed while a game runs.
pub enum KeyOutcome {
    /// Not a game key, or no game is running.
    Ignored,
    /// A direction key; the default browser action should be suppressed.
    Steered,
    /// Escape ended the game.
    Ended(GameSummary),
}

impl KeyOutcome {
    /// Returns whether the key belongs to the game.
    pub fn consumed(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Final result of a finished game.
pub struct GameSummary {
    /// Food eaten.
    pub score: u32,
}

fn direction_for_key(key: &str) -> Option<Direction> {
    match key.to_ascii_lowercase().as_str() {
        "arrowup" | "z" => Some(Direction::Up),
        "arrowdown" | "s" => Some(Direction::Down),
        "arrowleft" | "q" => Some(Direction::Left),
        "arrowright" | "d" => Some(Direction::Right),
        _ => None,
    }
}

/// Transcript line printed when a game ends.
pub fn game_over_line(score: u32) -> String {
    format!("Game over. Score: {score}")
}

/// One terminal window's state.
pub struct TerminalSession {
    lines: Vec<String>,
    game: Option<SnakeGame>,
    entropy: Rc<dyn EntropySource>,
}

impl TerminalSession {
    /// Creates an empty session drawing food placement from `entropy`.
    pub fn new(entropy: Rc<dyn EntropySource>) -> Self {
        Self {
            lines: Vec::new(),
            game: None,
            entropy,
        }
    }

    /// Transcript lines, oldest first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The running game, if any.
    pub fn game(&self) -> Option<&SnakeGame> {
        self.game.as_ref()
    }

    /// Returns whether a game currently owns the keyboard.
    pub fn game_running(&self) -> bool {
        self.game.is_some()
    }

    /// The input line is disabled for as long as a game runs.
    pub fn input_enabled(&self) -> bool {
        !self.game_running()
    }

    /// Runs one input line. `grid` sizes the playing field if the line starts a game.
    pub fn submit(&mut self, raw_line: &str, grid: GridSize) -> SubmitOutcome {
        let line = raw_line.trim();
        if line.is_empty() || !self.input_enabled() {
            return SubmitOutcome::Ignored;
        }

        self.lines.push(format!("{PROMPT} {line}"));
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();
        match command {
            "ls" => self.print(LS_OUTPUT),
            "whoami" => self.print(WHOAMI_OUTPUT),
            "pwd" => self.print(PWD_OUTPUT),
            "clear" => self.lines.clear(),
            "help" => self.print(HELP_OUTPUT),
            "echo" => {
                let text = words.collect::<Vec<_>>().join(" ");
                self.print(text);
            }
            "snake" => {
                self.start_game(grid);
                return SubmitOutcome::GameStarted;
            }
            other => self.print(format!("{other}: command not found")),
        }
        SubmitOutcome::Executed
    }

    /// Routes a `KeyboardEvent.key` value to the running game.
    ///
    /// Arrow keys and the `Z`/`Q`/`S`/`D` set steer; `Escape` ends the game.
    pub fn handle_key(&mut self, key: &str) -> KeyOutcome {
        let Some(game) = self.game.as_mut() else {
            return KeyOutcome::Ignored;
        };
        if key.eq_ignore_ascii_case("escape") {
            return self
                .finish_game()
                .map_or(KeyOutcome::Ignored, KeyOutcome::Ended);
        }
        match direction_for_key(key) {
            Some(direction) => {
                game.steer(direction);
                KeyOutcome::Steered
            }
            None => KeyOutcome::Ignored,
        }
    }

    /// Advances the running game by one step. Returns the summary if this step ended it.
    pub fn tick(&mut self) -> Option<GameSummary> {
        let game = self.game.as_mut()?;
        match game.tick(self.entropy.as_ref()) {
            TickOutcome::Moved | TickOutcome::Ate => None,
            TickOutcome::GameOver | TickOutcome::Stopped => self.finish_game(),
        }
    }

    /// Fits the running game onto a new grid.
    pub fn resize(&mut self, grid: GridSize) {
        if let Some(game) = self.game.as_mut() {
            game.resize(grid, self.entropy.as_ref());
        }
    }

    /// Ends a running game before the window goes away.
    pub fn dispose(&mut self) -> Option<GameSummary> {
        self.finish_game()
    }

    fn start_game(&mut self, grid: GridSize) {
        self.lines.clear();
        self.print(SNAKE_START_HINT);
        self.game = Some(SnakeGame::new(grid, self.entropy.as_ref()));
    }

    fn finish_game(&mut self) -> Option<GameSummary> {
        let mut game = self.game.take()?;
        let score = game.end();
        self.print(game_over_line(score));
        Some(GameSummary { score })
    }

    fn print(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }
}
