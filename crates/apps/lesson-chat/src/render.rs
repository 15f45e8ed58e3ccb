//! Plain-text rendering of the thread list and chat screen

use std::fmt::Write;

use chat::{ChatView, ComposeBox, SenderSide, ThreadSummary};

pub fn thread_list(rows: &[ThreadSummary]) -> String {
    if rows.is_empty() {
        return "Nenhuma conversa encontrada".to_string();
    }
    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {} [{}]  {}",
            i + 1,
            row.counterpart_name,
            row.last_message_time.as_deref().unwrap_or(""),
            row.last_message_text
        );
    }
    out.trim_end().to_string()
}

pub fn chat_screen(view: &ChatView, compose: &ComposeBox) -> String {
    let mut out = String::new();
    let thread = &view.thread;
    let _ = writeln!(
        out,
        "== {} ({}) ==",
        thread.counterpart_name(),
        thread.counterpart_avatar_ref()
    );

    if thread.messages().is_empty() {
        let _ = writeln!(out, "   Inicie sua conversa com {}", thread.counterpart_name());
    }
    for msg in thread.messages() {
        let who = match msg.sender_side() {
            SenderSide::SelfSide => "voce",
            SenderSide::Counterpart => thread.counterpart_name(),
        };
        let _ = writeln!(out, "   [{}] {}: {}", msg.display_timestamp(), who, msg.text());
    }

    if view.quick_actions_visible {
        for (i, action) in view.quick_actions.iter().enumerate() {
            let _ = writeln!(out, "   quick {}: {}", i + 1, action.label);
        }
    }
    let _ = write!(out, "> {}", compose.text());
    out
}
