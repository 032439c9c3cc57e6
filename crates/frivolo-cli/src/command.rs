//! REPL input parsing.

/// Slash commands offered for completion, in help order.
pub const COMMANDS: &[&str] = &[
    "/save", "/history", "/use", "/delete", "/profile", "/edit", "/cancel", "/reset", "/clear",
    "/help", "/quit",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A bare amount such as `2500`, `$2,500` or `2500 MXN`.
    Price(f64),
    Save(String),
    History,
    /// 1-based row of the last history listing.
    Use(usize),
    Delete(usize),
    Profile,
    Edit,
    Cancel,
    Reset,
    Clear,
    Help,
    Quit,
    /// Input that is neither an amount nor a known command.
    Invalid(String),
}

impl Command {
    pub fn parse(input: &str) -> Option<Command> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let Some(rest) = input.strip_prefix('/') else {
            return Some(match parse_amount(input) {
                Some(price) => Command::Price(price),
                None => Command::Invalid(format!("'{}' no es una cantidad", input)),
            });
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        Some(match name {
            "save" => Command::Save(arg.to_string()),
            "history" | "h" => Command::History,
            "use" => row_arg(arg).map_or_else(usage("/use <n>"), Command::Use),
            "delete" => row_arg(arg).map_or_else(usage("/delete <n>"), Command::Delete),
            "profile" => Command::Profile,
            "edit" => Command::Edit,
            "cancel" => Command::Cancel,
            "reset" => Command::Reset,
            "clear" => Command::Clear,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => Command::Invalid(format!("comando desconocido: /{}", other)),
        })
    }
}

fn usage(text: &'static str) -> impl FnOnce() -> Command {
    move || Command::Invalid(format!("uso: {}", text))
}

fn row_arg(arg: &str) -> Option<usize> {
    arg.parse::<usize>().ok().filter(|n| *n > 0)
}

/// Accepts the ways people write a peso amount.
pub fn parse_amount(input: &str) -> Option<f64> {
    let mut text = input.trim();
    for suffix in ["MXN", "mxn"] {
        text = text.strip_suffix(suffix).unwrap_or(text).trim_end();
    }
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' ' | '_'))
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amounts() {
        assert_eq!(Command::parse("2500"), Some(Command::Price(2500.0)));
        assert_eq!(Command::parse("$2,500"), Some(Command::Price(2500.0)));
        assert_eq!(Command::parse(" 1,234.50 MXN "), Some(Command::Price(1234.5)));
        assert_eq!(Command::parse("0"), Some(Command::Price(0.0)));
        assert!(matches!(Command::parse("dos mil"), Some(Command::Invalid(_))));
        assert_eq!(parse_amount("inf"), None);
    }

    #[test]
    fn test_blank_input_is_ignored() {
        assert_eq!(Command::parse("   "), None);
    }

    #[test]
    fn test_save_keeps_the_whole_name() {
        assert_eq!(
            Command::parse("/save Audífonos inalámbricos"),
            Some(Command::Save("Audífonos inalámbricos".to_string()))
        );
        assert_eq!(Command::parse("/save"), Some(Command::Save(String::new())));
    }

    #[test]
    fn test_row_arguments_are_one_based() {
        assert_eq!(Command::parse("/use 2"), Some(Command::Use(2)));
        assert_eq!(Command::parse("/delete 1"), Some(Command::Delete(1)));
        assert!(matches!(Command::parse("/use 0"), Some(Command::Invalid(_))));
        assert!(matches!(Command::parse("/delete x"), Some(Command::Invalid(_))));
    }

    #[test]
    fn test_aliases_and_unknown() {
        assert_eq!(Command::parse("/exit"), Some(Command::Quit));
        assert_eq!(Command::parse("/h"), Some(Command::History));
        assert!(matches!(Command::parse("/plan"), Some(Command::Invalid(_))));
    }

    #[test]
    fn test_every_listed_command_parses() {
        for name in COMMANDS {
            let parsed = Command::parse(&format!("{} 1", name));
            assert!(
                !matches!(parsed, Some(Command::Invalid(_)) | None),
                "{} did not parse",
                name
            );
        }
    }
}
