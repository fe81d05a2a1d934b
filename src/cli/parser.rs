/// Enum representing CLI commands
#[derive(Debug, PartialEq)]
pub enum Command {
    Create { owner: String, repo: String },
    Update { owner: String, repo: String, number: u64 },
    Read { owner: String, repo: String, number: u64 },
    Close { owner: String, repo: String, number: u64 },
    Reopen { owner: String, repo: String, number: u64 },
    Help,
    /// Invalid invocation, with the reason to show alongside the usage text.
    Invalid(String),
}

pub const USAGE: &str = "\
Usage: gissue <action> <owner> <repo> [<issue_number>]

Actions:
  create   Compose a new issue in your editor
  update   Edit the title and body of an existing issue
  read     Print an issue
  close    Close an issue
  reopen   Reopen a closed issue

The issue number is required for every action except create.

Environment:
  GITHUB_TOKEN   API token sent with every request
  GIT_EDITOR     Editor command (falls back to EDITOR, then vim)";

/// Actions that address an existing issue
const NUMBERED_ACTIONS: &[&str] = &["update", "read", "close", "reopen"];

/// Parse command line arguments and return a Command
///
/// # Arguments
/// * `args` - Command line arguments (including program name)
///
/// # Returns
/// * `Command` - The parsed command
pub fn parse_args(args: &[String]) -> Command {
    let Some(action) = args.get(1).map(String::as_str) else {
        return Command::Invalid("Missing action.".to_string());
    };

    if matches!(action, "help" | "--help" | "-h") {
        return Command::Help;
    }
    if action != "create" && !NUMBERED_ACTIONS.contains(&action) {
        return Command::Invalid(format!("Unknown action `{action}`."));
    }

    let (owner, repo) = match (args.get(2), args.get(3)) {
        (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
            (owner.clone(), repo.clone())
        }
        _ => {
            return Command::Invalid(format!(
                "Missing repository argument. Usage: gissue {action} <owner> <repo>"
            ));
        }
    };

    if action == "create" {
        return Command::Create { owner, repo };
    }

    let number = match args.get(4) {
        Some(raw) => match raw.parse::<u64>() {
            Ok(number) if number > 0 => number,
            _ => return Command::Invalid(format!("Invalid issue number `{raw}`.")),
        },
        None => {
            return Command::Invalid(format!(
                "Missing issue number. Usage: gissue {action} <owner> <repo> <issue_number>"
            ));
        }
    };

    match action {
        "update" => Command::Update {
            owner,
            repo,
            number,
        },
        "read" => Command::Read {
            owner,
            repo,
            number,
        },
        "close" => Command::Close {
            owner,
            repo,
            number,
        },
        "reopen" => Command::Reopen {
            owner,
            repo,
            number,
        },
        _ => unreachable!(),
    }
}
