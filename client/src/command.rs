//! Terminal commands of the `tasklist` binary.

use crate::controller::TaskListAction;
use crate::view::TaskListView;
use std::str::FromStr;
use tasklist_tasks::Filter;
use thiserror::Error;

/// Usage text printed by `help` and after a bad command
pub const USAGE: &str = "commands: add <title> | toggle <n> | rm <n> | clear | filter <all|active|completed> | list | help | quit";

/// One line of user input
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `add <title>`
    Add(String),
    /// `toggle <n>`
    Toggle(usize),
    /// `rm <n>`
    Remove(usize),
    /// `clear`
    Clear,
    /// `filter <name>`
    Filter(Filter),
    /// `list`
    List,
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// Why a line was not understood
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown verb
    #[error("unknown command: {0}")]
    Unknown(String),
    /// Verb needs an argument
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
    /// Row number not a positive integer
    #[error("not a task number: {0}")]
    BadNumber(String),
    /// Row number not on screen
    #[error("no task numbered {0}")]
    NoSuchRow(usize),
    /// Unknown filter name
    #[error(transparent)]
    Filter(#[from] tasklist_tasks::types::UnknownFilter),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let argument = |name: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument(name))
            } else {
                Ok(rest)
            }
        };
        let number = |name: &'static str| {
            argument(name)?
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| CommandError::BadNumber(rest.to_string()))
        };

        match verb {
            // Blank titles go through so the controller reports them
            "add" => Ok(Self::Add(rest.to_string())),
            "toggle" => Ok(Self::Toggle(number("toggle")?)),
            "rm" => Ok(Self::Remove(number("rm")?)),
            "clear" => Ok(Self::Clear),
            "filter" => Ok(Self::Filter(argument("filter")?.parse()?)),
            "list" | "" => Ok(Self::List),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

impl Command {
    /// The controller action for this command, resolving row numbers
    /// against what is on screen. `None` for commands that only print.
    ///
    /// # Errors
    ///
    /// [`CommandError::NoSuchRow`] when the number is not shown.
    pub fn to_action(&self, view: &TaskListView) -> Result<Option<TaskListAction>, CommandError> {
        let row = |n: usize| view.id_at(n).cloned().ok_or(CommandError::NoSuchRow(n));

        Ok(match self {
            Self::Add(title) => Some(TaskListAction::Create {
                title: title.clone(),
            }),
            Self::Toggle(n) => Some(TaskListAction::Toggle { id: row(*n)? }),
            Self::Remove(n) => Some(TaskListAction::Remove { id: row(*n)? }),
            Self::Clear => Some(TaskListAction::ClearCompleted),
            Self::Filter(filter) => Some(TaskListAction::SetFilter { filter: *filter }),
            Self::List | Self::Help | Self::Quit => None,
        })
    }
}
