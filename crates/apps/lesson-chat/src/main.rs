//! lesson-chat - terminal host for the lesson booking chat core
//!
//! Reads one command per line from stdin and prints the resulting screen.

use std::io::{self, BufRead, Write};

use chat::{ChatSession, ChatSettings, SystemClock};
use log::{error, info, warn};
use std::sync::Arc;

mod app;
mod input;
mod render;

use app::{LessonChatApp, Outcome};
use input::Command;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    let settings = match ChatSettings::load() {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Ignoring chat settings: {:#}", e);
            if let Some(path) = ChatSettings::default_settings_path() {
                warn!("Fix or remove {} to silence this warning", path.display());
            }
            ChatSettings::default()
        }
    };

    let mut app = LessonChatApp::new(ChatSession::with_settings(settings, Arc::new(SystemClock)));
    info!("lesson-chat started; type `help` for commands");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(stdout, "{}", e)?;
                continue;
            }
        };
        match app.execute(command) {
            Ok(Outcome::Print(text)) => writeln!(stdout, "{}", text)?,
            Ok(Outcome::Quit) => break,
            Err(e) => writeln!(stdout, "error: {:#}", e)?,
        }
        stdout.flush()?;
    }

    info!("lesson-chat exiting");
    Ok(())
}
