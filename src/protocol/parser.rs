//! Worker command parser.
//!
//! Parses incoming worker protocol commands from raw text into structured
//! `Command` variants that the main loop can dispatch on.

/// A parsed driver-to-worker command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Protocol handshake.
    Iris,

    /// Synchronization ping; the worker must reply `readyok`.
    IsReady,

    /// Forget the current position.
    NewGame,

    /// Set the position from flat-tuple text.
    Position { tuple: String },

    /// Apply a move, given as `pawn,node`, to the current position.
    Play { mv: String },

    /// Reseed the move selector.
    Seed(u64),

    /// List the legal moves of the current position.
    Legal,

    /// Select a move for the side to move.
    Go,

    /// Terminate the worker process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging to stderr.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };

    match head {
        "" => None,
        "iris" => Some(Command::Iris),
        "isready" => Some(Command::IsReady),
        "newgame" => Some(Command::NewGame),
        "legal" => Some(Command::Legal),
        "go" => Some(Command::Go),
        "quit" => Some(Command::Quit),

        "position" => with_argument("position <tuple>", rest, |tuple| Command::Position {
            tuple: tuple.to_string(),
        }),
        "play" => with_argument("play <pawn,node>", rest, |mv| Command::Play {
            mv: mv.to_string(),
        }),
        "seed" => match rest.parse::<u64>() {
            Ok(seed) => Some(Command::Seed(seed)),
            Err(_) => {
                eprintln!("invalid seed value: '{}'", rest);
                None
            }
        },

        other => {
            eprintln!("unknown command: {}", other);
            None
        }
    }
}

fn with_argument(usage: &str, rest: &str, build: impl FnOnce(&str) -> Command) -> Option<Command> {
    if rest.is_empty() {
        eprintln!("malformed command: expected '{}'", usage);
        return None;
    }
    Some(build(rest))
}
