//! The command language: `pfm`, `ppt`, `np`, `kp`, `sb`, `lb`.

use crate::error::SimError;
use crate::report::{format_free_map, format_load, format_page_table, format_store};
use crate::simulator::Simulator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `pfm`
    PrintFreeMap,
    /// `ppt <proc>`
    PrintPageTable { proc_num: usize },
    /// `np <proc> <page_count>`
    NewProcess { proc_num: usize, page_count: usize },
    /// `kp <proc>`
    KillProcess { proc_num: usize },
    /// `sb <proc> <vaddr> <value>`
    StoreByte { proc_num: usize, vaddr: usize, value: u8 },
    /// `lb <proc> <vaddr>`
    LoadByte { proc_num: usize, vaddr: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("{command}: missing {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("{command}: invalid {argument}: {token}")]
    InvalidNumber {
        command: &'static str,
        argument: &'static str,
        token: String,
    },
}

/// Parse whitespace separated command tokens, e.g. the contents of a script
pub fn parse_script(content: &str) -> Result<Vec<Command>, ParseError> {
    commands(content.split_whitespace()).collect()
}

/// Parse a complete token list into commands, stopping at the first error
pub fn parse_commands<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Command>, ParseError> {
    commands(tokens.iter().map(AsRef::<str>::as_ref)).collect()
}

/// Lazily parse commands from a token stream
///
/// A bad token yields one `Err` and parsing resumes with the token after it,
/// so callers can keep running the rest of the commands.
pub fn commands<'a, I>(tokens: I) -> Commands<I::IntoIter>
where
    I: IntoIterator<Item = &'a str>,
{
    Commands { tokens: tokens.into_iter() }
}

pub struct Commands<I> {
    tokens: I,
}

impl<'a, I: Iterator<Item = &'a str>> Commands<I> {
    fn number(
        &mut self,
        command: &'static str,
        argument: &'static str,
    ) -> Result<usize, ParseError> {
        let token = self
            .tokens
            .next()
            .ok_or(ParseError::MissingArgument { command, argument })?;
        token.parse().map_err(|_| ParseError::InvalidNumber {
            command,
            argument,
            token: token.to_string(),
        })
    }

    fn parse(&mut self, name: &str) -> Result<Command, ParseError> {
        let command = match name {
            "pfm" => Command::PrintFreeMap,
            "ppt" => Command::PrintPageTable { proc_num: self.number("ppt", "process")? },
            "np" => Command::NewProcess {
                proc_num: self.number("np", "process")?,
                page_count: self.number("np", "page count")?,
            },
            "kp" => Command::KillProcess { proc_num: self.number("kp", "process")? },
            "sb" => Command::StoreByte {
                proc_num: self.number("sb", "process")?,
                vaddr: self.number("sb", "address")?,
                // Only the low byte is stored
                value: self.number("sb", "value")? as u8,
            },
            "lb" => Command::LoadByte {
                proc_num: self.number("lb", "process")?,
                vaddr: self.number("lb", "address")?,
            },
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

impl<'a, I: Iterator<Item = &'a str>> Iterator for Commands<I> {
    type Item = Result<Command, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.tokens.next()?;
        Some(self.parse(name))
    }
}

impl Command {
    /// Run the command, returning the text it prints, if any
    pub fn execute(&self, sim: &mut Simulator) -> Result<Option<String>, SimError> {
        let output = match *self {
            Command::PrintFreeMap => Some(format_free_map(&sim.free_map_snapshot())),
            Command::PrintPageTable { proc_num } => {
                Some(format_page_table(proc_num, &sim.page_table_snapshot(proc_num)?))
            }
            Command::NewProcess { proc_num, page_count } => {
                sim.create_process(proc_num, page_count)?;
                None
            }
            Command::KillProcess { proc_num } => {
                sim.destroy_process(proc_num)?;
                None
            }
            Command::StoreByte { proc_num, vaddr, value } => {
                Some(format_store(&sim.store_byte(proc_num, vaddr, value)?))
            }
            Command::LoadByte { proc_num, vaddr } => {
                Some(format_load(&sim.load_byte(proc_num, vaddr)?))
            }
        };
        Ok(output)
    }
}
