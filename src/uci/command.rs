#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Everything after `position`
    Position(Vec<String>),
    GoDepth(u32),
    Perft(usize),
    Divide(usize),
    Eval,
    NewGame,
    ClearCache,
    Set { key: String, value: String },
    Display,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parts: Vec<&str> = trimmed.split_whitespace().collect();

    let number = |idx: usize| parts.get(idx).and_then(|v| v.parse::<usize>().ok());

    let cmd = match parts[0] {
        "position" => Command::Position(parts[1..].iter().map(|p| (*p).to_string()).collect()),
        "go" => match (parts.get(1), parts.get(2).and_then(|v| v.parse::<u32>().ok())) {
            (Some(&"depth"), Some(depth)) => Command::GoDepth(depth),
            _ => Command::Unknown(trimmed.to_string()),
        },
        "perft" => Command::Perft(number(1).unwrap_or(1)),
        "divide" => Command::Divide(number(1).unwrap_or(1)),
        "eval" => Command::Eval,
        "newgame" | "ucinewgame" => Command::NewGame,
        "clearcache" => Command::ClearCache,
        "set" => match (parts.get(1), parts.get(2)) {
            (Some(key), Some(value)) => Command::Set {
                key: (*key).to_string(),
                value: (*value).to_string(),
            },
            _ => Command::Unknown(trimmed.to_string()),
        },
        "d" | "display" => Command::Display,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    };

    Some(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("   "), None);
        assert_eq!(parse_command("go depth 4"), Some(Command::GoDepth(4)));
        assert_eq!(parse_command("perft 3"), Some(Command::Perft(3)));
        assert_eq!(parse_command("divide"), Some(Command::Divide(1)));
        assert_eq!(
            parse_command("set batch on"),
            Some(Command::Set {
                key: "batch".to_string(),
                value: "on".to_string()
            })
        );
        assert_eq!(
            parse_command("position startpos moves e2e4"),
            Some(Command::Position(vec![
                "startpos".to_string(),
                "moves".to_string(),
                "e2e4".to_string()
            ]))
        );
        assert!(matches!(parse_command("go infinite"), Some(Command::Unknown(_))));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
    }
}
