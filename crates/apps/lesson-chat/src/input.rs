//! Line commands understood by the terminal host

use anyhow::{Context, Result, bail};
use chat::Counterpart;

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// open <counterpart-id> <avatar-ref> <name...>
    Open(Counterpart),
    /// request <counterpart-id> <avatar-ref> <name...>
    Request(Counterpart),
    /// list
    List,
    /// goto <row> (1-based row from `list`)
    Goto(usize),
    /// send [text...]; without text, sends what is in the compose box
    Send(Option<String>),
    /// quick <n> (1-based quick reply)
    Quick(usize),
    /// receive <counterpart-id> <text...>
    Receive { counterpart_id: String, text: String },
    Back,
    Show,
    Logout,
    Help,
    Quit,
}

/// Help text shown by `help`
pub const HELP: &str = "\
Commands:
  open <id> <avatar> <name...>      open a chat with no preset message
  request <id> <avatar> <name...>   request a lesson (shows quick replies)
  list                              list conversations with messages
  goto <row>                        open a conversation from the list
  quick <n>                         put quick reply n into the compose box
  send [text...]                    send text, or the compose box if omitted
  receive <id> <text...>            simulate a message from a counterpart
  show                              show the active chat
  back                              leave the active chat
  logout                            discard all conversations
  help | quit";

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "open" => Command::Open(parse_counterpart(rest)?),
            "request" => Command::Request(parse_counterpart(rest)?),
            "list" | "ls" => Command::List,
            "goto" => Command::Goto(parse_index(rest, "goto <row>")?),
            "send" => Command::Send((!rest.is_empty()).then(|| rest.to_string())),
            "quick" => Command::Quick(parse_index(rest, "quick <n>")?),
            "receive" => {
                let (id, text) = rest
                    .split_once(char::is_whitespace)
                    .context("usage: receive <id> <text...>")?;
                Command::Receive {
                    counterpart_id: id.to_string(),
                    text: text.trim().to_string(),
                }
            }
            "back" => Command::Back,
            "show" => Command::Show,
            "logout" => Command::Logout,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => bail!("unknown command: {} (try `help`)", other),
        };
        Ok(Some(command))
    }
}

fn parse_counterpart(rest: &str) -> Result<Counterpart> {
    let mut parts = rest.splitn(3, char::is_whitespace);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(id), Some(avatar), Some(name))
            if !id.is_empty() && !avatar.is_empty() && !name.trim().is_empty() =>
        {
            Ok(Counterpart::new(id, name.trim(), avatar))
        }
        _ => bail!("usage: <id> <avatar> <name...>"),
    }
}

/// Parse a 1-based position into a 0-based index
fn parse_index(rest: &str, usage: &str) -> Result<usize> {
    let n: usize = rest
        .parse()
        .with_context(|| format!("usage: {}", usage))?;
    if n == 0 {
        bail!("positions start at 1");
    }
    Ok(n - 1)
}
