//! Command dispatch over a chat session

use anyhow::{Context, Result, bail};
use chat::{
    ChatError, ChatSession, ComposeBox, Counterpart, CounterpartId, ThreadId, chat_view,
    list_threads_with_activity,
};
use log::debug;

use crate::input::{Command, HELP};
use crate::render;

/// What the main loop should do after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Print(String),
    Quit,
}

pub struct LessonChatApp {
    session: ChatSession,
    compose: ComposeBox,
    /// Thread ids in the order last shown by `list`, for `goto`
    listing: Vec<ThreadId>,
}

impl LessonChatApp {
    pub fn new(session: ChatSession) -> Self {
        Self {
            session,
            compose: ComposeBox::new(),
            listing: Vec::new(),
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        debug!("Executing {:?}", command);
        let output = match command {
            Command::Open(counterpart) => {
                self.session.open_chat(counterpart);
                self.render_chat()
            }
            Command::Request(counterpart) => {
                self.session.request_contact(counterpart);
                self.render_chat()
            }
            Command::List => {
                let rows = list_threads_with_activity(self.session.store());
                self.listing = rows.iter().map(|r| r.id.clone()).collect();
                render::thread_list(&rows)
            }
            Command::Goto(row) => {
                let thread_id = self
                    .listing
                    .get(row)
                    .cloned()
                    .context("no such row; run `list` first")?;
                self.session.open_thread(&thread_id)?;
                self.render_chat()
            }
            Command::Quick(index) => {
                if self.session.select_quick_action(index).is_none() {
                    bail!("no quick reply {} available", index + 1);
                }
                self.render_chat()
            }
            Command::Send(text) => {
                self.compose.sync(&self.session);
                if let Some(text) = text {
                    self.compose.set_text(text);
                }
                match self.compose.submit(&mut self.session) {
                    Ok(_) => self.render_chat(),
                    Err(ChatError::EmptyText) => "nothing to send".to_string(),
                    Err(ChatError::NoActiveThread) => bail!("open a chat first"),
                    Err(e) => return Err(e.into()),
                }
            }
            Command::Receive {
                counterpart_id,
                text,
            } => {
                let counterpart = self.known_counterpart(&counterpart_id);
                let message = self.session.receive_message(counterpart, &text)?;
                format!("[{}] new message from {}", message.display_timestamp(), counterpart_id)
            }
            Command::Back => {
                self.session.close_chat();
                self.compose.sync(&self.session);
                "left chat".to_string()
            }
            Command::Show => self.render_chat(),
            Command::Logout => {
                self.session.sign_out();
                self.listing.clear();
                self.compose = ComposeBox::new();
                "signed out".to_string()
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Print(output))
    }

    /// Counterpart details from an existing thread, or the bare id
    fn known_counterpart(&self, id: &str) -> Counterpart {
        match self.session.store().find_by_counterpart(&CounterpartId::new(id)) {
            Some(thread) => Counterpart::new(
                id,
                thread.counterpart_name(),
                thread.counterpart_avatar_ref(),
            ),
            None => Counterpart::new(id, id, ""),
        }
    }

    fn render_chat(&mut self) -> String {
        self.compose.sync(&self.session);
        match chat_view(&self.session) {
            Some(view) => render::chat_screen(&view, &self.compose),
            None => "no active chat".to_string(),
        }
    }
}
