/// Options of the `board` command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardArgs {
    pub repositories: Vec<String>,
    pub account: Option<String>,
    pub token: Option<String>,
    pub pause_labels: Vec<String>,
    pub ignore_label_case: bool,
    pub json: bool,
    pub fixture: Option<String>,
}

/// Enum representing CLI commands
#[derive(Debug, PartialEq)]
pub enum Command {
    Board(BoardArgs),
    Help,
    Unknown(String),
}

pub const USAGE: &str = "\
Usage: kanban board [options]

Options:
  -r, --repo <name>         repository to show, as <owner>/<repo> or <repo> (repeatable)
  -a, --account <name>      account owning repositories given without an owner
  -t, --token <token>       API token (defaults to GH_TOKEN)
  -l, --pause-label <name>  label marking an active issue as paused (repeatable)
      --ignore-label-case   match pause labels case-insensitively
      --json                print the board as JSON
      --fixture <file>      read records from a JSON fixture instead of the API
  -h, --help                show this help";

/// Options taking a value
const VALUE_OPTIONS: &[&str] = &[
    "-r",
    "--repo",
    "-a",
    "--account",
    "-t",
    "--token",
    "-l",
    "--pause-label",
    "--fixture",
];

/// Parse command line arguments and return a Command
///
/// # Arguments
/// * `args` - Command line arguments (including program name)
///
/// # Returns
/// * `Command` - The parsed command
pub fn parse_args(args: &[String]) -> Command {
    match args.get(1).map(String::as_str) {
        None | Some("help") | Some("-h") | Some("--help") => Command::Help,
        Some("board") => parse_board_args(&args[2..]),
        Some(option) if option.starts_with('-') => parse_board_args(&args[1..]),
        Some(cmd) => Command::Unknown(cmd.to_string()),
    }
}

fn parse_board_args(args: &[String]) -> Command {
    let mut board = BoardArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let (option, inline_value) = match arg.split_once('=') {
            Some((option, value)) if option.starts_with("--") => (option, Some(value.to_string())),
            _ => (arg.as_str(), None),
        };

        match option {
            "-h" | "--help" => return Command::Help,
            "--json" => board.json = true,
            "--ignore-label-case" => board.ignore_label_case = true,
            _ if VALUE_OPTIONS.contains(&option) => {
                let Some(value) = inline_value.or_else(|| iter.next().cloned()) else {
                    return Command::Unknown(format!("Missing value for {option}"));
                };
                let value = value.trim().to_string();
                match option {
                    "-r" | "--repo" => board.repositories.push(value),
                    "-a" | "--account" => board.account = Some(value),
                    "-t" | "--token" => board.token = Some(value),
                    "-l" | "--pause-label" => board.pause_labels.push(value),
                    "--fixture" => board.fixture = Some(value),
                    _ => unreachable!(),
                }
            }
            _ => return Command::Unknown(format!("Unknown option {arg}")),
        }
    }

    Command::Board(board)
}
