//! Line-oriented command loop driving the searcher.
//!
//! Commands: `position startpos|fen <fen> [moves ...]`, `go depth <n>`,
//! `perft <n>`, `divide <n>`, `eval`, `newgame`, `clearcache`,
//! `set <key> <value>`, `d`, `quit`.

use std::fmt;
use std::io::{self, BufRead, Write};

use crate::board::{
    divide, perft, Evaluator, FenError, MaterialEvaluator, MoveParseError, Position,
    ScoreConvention, SearchError, Searcher, MAX_DEPTH,
};

pub mod command;

use command::{parse_command, Command};

/// Error type for a command that could not be carried out
#[derive(Debug, Clone)]
pub enum CommandError {
    /// Invalid FEN string
    InvalidFen(FenError),
    /// Invalid move in the move list
    InvalidMove { move_str: String, error: MoveParseError },
    /// Missing required parts in the command
    MissingParts,
    /// Unknown `set` key or value
    InvalidSetting { key: String, value: String },
    /// Depth outside what perft or divide support
    InvalidDepth(usize),
    Search(SearchError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::InvalidFen(e) => write!(f, "Invalid FEN: {e}"),
            CommandError::InvalidMove { move_str, error } => {
                write!(f, "Invalid move '{move_str}': {error}")
            }
            CommandError::MissingParts => write!(f, "Missing required parts in position command"),
            CommandError::InvalidSetting { key, value } => {
                write!(f, "Unknown setting '{key} {value}'")
            }
            CommandError::InvalidDepth(depth) => {
                write!(f, "Depth {depth} outside 1..={MAX_DEPTH}")
            }
            CommandError::Search(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<FenError> for CommandError {
    fn from(e: FenError) -> Self {
        CommandError::InvalidFen(e)
    }
}

impl From<SearchError> for CommandError {
    fn from(e: SearchError) -> Self {
        CommandError::Search(e)
    }
}

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Current game plus the searcher that plays it.
pub struct Session {
    position: Position,
    searcher: Searcher<MaterialEvaluator>,
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Session {
            position: Position::startpos(),
            searcher: Searcher::new(MaterialEvaluator::default()),
        }
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[must_use]
    pub fn searcher(&self) -> &Searcher<MaterialEvaluator> {
        &self.searcher
    }

    /// Run one command line, writing any reply to `out`.
    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<Flow> {
        let Some(cmd) = parse_command(line) else {
            return Ok(Flow::Continue);
        };
        match self.execute(cmd, out) {
            Ok(flow) => Ok(flow),
            Err(ExecError::Io(e)) => Err(e),
            Err(ExecError::Command(e)) => {
                writeln!(out, "error: {e}")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn execute(&mut self, cmd: Command, out: &mut impl Write) -> Result<Flow, ExecError> {
        match cmd {
            Command::Position(parts) => {
                let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                self.set_position(&parts)?;
            }
            Command::GoDepth(depth) => {
                let result = self
                    .searcher
                    .best_move(&self.position, depth)
                    .map_err(CommandError::from)?;
                match result.best_move {
                    Some(mv) => {
                        writeln!(
                            out,
                            "info depth {} nodes {} eval {:.4}",
                            result.depth, result.nodes, result.eval
                        )?;
                        writeln!(out, "bestmove {mv}")?;
                        self.position = result.position;
                    }
                    None => writeln!(out, "bestmove (none) eval {:.4}", result.eval)?,
                }
            }
            Command::Perft(depth) => {
                let depth = checked_depth(depth)?;
                writeln!(out, "nodes {}", perft(&self.position, depth))?;
            }
            Command::Divide(depth) => {
                let depth = checked_depth(depth)?;
                let mut total = 0;
                for (mv, nodes) in divide(&self.position, depth) {
                    writeln!(out, "{mv}: {nodes}")?;
                    total += nodes;
                }
                writeln!(out, "nodes {total}")?;
            }
            Command::Eval => {
                let score = self
                    .searcher
                    .evaluator_mut()
                    .evaluate(&self.position)
                    .map_err(|e| CommandError::Search(e.into()))?;
                writeln!(out, "eval {score:.4}")?;
            }
            Command::NewGame => {
                self.searcher.new_game();
                self.position = Position::startpos();
            }
            Command::ClearCache => self.searcher.clear_cache(),
            Command::Set { key, value } => self.apply_setting(&key, &value)?,
            Command::Display => writeln!(out, "{}\n{}", self.position, self.position.to_fen())?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Unknown(line) => writeln!(out, "unknown command: {line}")?,
        }
        Ok(Flow::Continue)
    }

    /// Parse `startpos|fen <fen> [moves ...]`. Every position reached along
    /// the move list is recorded in the game history.
    pub fn set_position(&mut self, parts: &[&str]) -> Result<(), CommandError> {
        let mut i = 0;
        let mut position = match parts.first() {
            Some(&"startpos") => {
                i += 1;
                Position::startpos()
            }
            Some(&"fen") => {
                let end = parts
                    .iter()
                    .position(|p| *p == "moves")
                    .unwrap_or(parts.len());
                if end < 5 {
                    return Err(CommandError::MissingParts);
                }
                i = end;
                Position::try_from_fen(&parts[1..end].join(" "))?
            }
            _ => return Err(CommandError::MissingParts),
        };

        let mut reached = vec![position];
        if parts.get(i) == Some(&"moves") {
            for move_str in &parts[i + 1..] {
                let mv = position
                    .parse_move(move_str)
                    .map_err(|error| CommandError::InvalidMove {
                        move_str: (*move_str).to_string(),
                        error,
                    })?;
                position = position.play(&mv);
                reached.push(position);
            }
        }

        for pos in &reached {
            self.searcher.history_mut().record(pos);
        }
        self.position = position;
        Ok(())
    }

    fn apply_setting(&mut self, key: &str, value: &str) -> Result<(), CommandError> {
        let invalid = || CommandError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
        };
        let on_off = || match value {
            "on" | "true" => Ok(true),
            "off" | "false" => Ok(false),
            _ => Err(invalid()),
        };
        match key {
            "convention" => {
                let convention = match value {
                    "absolute" => ScoreConvention::Absolute,
                    "side" => ScoreConvention::SideToMove,
                    _ => return Err(invalid()),
                };
                self.searcher.set_convention(convention);
                self.searcher.evaluator_mut().convention = convention;
            }
            "batch" => self.searcher.params_mut().batch_leaves = on_off()?,
            "extend" => self.searcher.params_mut().endgame_extension = on_off()?,
            "repetition" => self.searcher.params_mut().avoid_repetition = on_off()?,
            _ => return Err(invalid()),
        }
        Ok(())
    }
}

fn checked_depth(depth: usize) -> Result<usize, CommandError> {
    if (1..=MAX_DEPTH).contains(&depth) {
        Ok(depth)
    } else {
        Err(CommandError::InvalidDepth(depth))
    }
}

enum ExecError {
    Io(io::Error),
    Command(CommandError),
}

impl From<io::Error> for ExecError {
    fn from(e: io::Error) -> Self {
        ExecError::Io(e)
    }
}

impl From<CommandError> for ExecError {
    fn from(e: CommandError) -> Self {
        ExecError::Command(e)
    }
}

/// Read commands from stdin until `quit` or end of input.
pub fn run_loop() -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut session = Session::new();

    for line in stdin.lock().lines() {
        let line = line?;
        if session.handle_line(&line, &mut out)? == Flow::Quit {
            break;
        }
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(session: &mut Session, line: &str) -> String {
        let mut out = Vec::new();
        session.handle_line(line, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_position_with_moves() {
        let mut session = Session::new();
        run(&mut session, "position startpos moves e2e4 e7e5");
        assert_eq!(
            session.position().to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 1"
        );
        assert_eq!(session.searcher().history().len(), 3);
    }

    #[test]
    fn test_position_fen() {
        let mut session = Session::new();
        run(&mut session, "position fen 4k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert_eq!(session.position().to_fen(), "4k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        let reply = run(&mut session, "position fen 4k3/8/8 w");
        assert!(reply.starts_with("error:"));
    }

    #[test]
    fn test_go_plays_the_move() {
        let mut session = Session::new();
        run(&mut session, "set extend off");
        run(&mut session, "position fen 3qk3/8/8/8/8/8/8/3QK3 w - - 0 1");
        let reply = run(&mut session, "go depth 1");
        assert!(reply.contains("bestmove d1d8"), "{reply}");
        assert_eq!(session.position().side_to_move(), crate::board::Color::Black);
    }

    #[test]
    fn test_perft_and_errors() {
        let mut session = Session::new();
        assert_eq!(run(&mut session, "perft 2"), "nodes 400\n");
        assert!(run(&mut session, "perft 0").starts_with("error:"));
        assert!(run(&mut session, "go depth 40").starts_with("error:"));
        assert!(run(&mut session, "set batch maybe").starts_with("error:"));
        assert!(run(&mut session, "position startpos moves e2e5").starts_with("error:"));
    }

    #[test]
    fn test_settings() {
        let mut session = Session::new();
        run(&mut session, "set convention side");
        run(&mut session, "set batch on");
        run(&mut session, "set repetition off");
        let params = session.searcher().params();
        assert_eq!(params.convention, ScoreConvention::SideToMove);
        assert!(params.batch_leaves);
        assert!(!params.avoid_repetition);
    }

    #[test]
    fn test_quit() {
        let mut session = Session::new();
        let mut out = Vec::new();
        assert_eq!(session.handle_line("quit", &mut out).unwrap(), Flow::Quit);
    }
}
