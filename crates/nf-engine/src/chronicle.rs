//! Chronicle export.
//!
//! Renders the character's nightly journal, as accumulated by the rest
//! transition, to Markdown or plain text.

use std::fmt::Write;

use nf_core::GameState;

fn subtitle(state: &GameState) -> String {
    let c = &state.character;
    format!(
        "{} {} {} of the {}th Generation, once {}",
        c.gender, c.race, c.class, state.generation, c.background
    )
}

/// Split a stored entry into its `Night of Day N` title and body.
fn split_entry(entry: &str) -> (Option<&str>, &str) {
    match entry.split_once(": ") {
        Some((title, body)) if title.starts_with("Night of Day ") => (Some(title), body.trim()),
        _ => (None, entry.trim()),
    }
}

/// Render the chronicle as a Markdown document.
pub fn export_markdown(state: &GameState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# The Chronicle of {}\n", state.character.name);
    let _ = writeln!(out, "*{}.*\n", subtitle(state));

    if state.chronicle.is_empty() {
        out.push_str("_No nights have yet been recorded._\n");
    }
    for entry in &state.chronicle {
        match split_entry(entry) {
            (Some(title), body) => {
                let _ = writeln!(out, "## {title}\n\n{body}\n");
            }
            (None, body) => {
                let _ = writeln!(out, "{body}\n");
            }
        }
    }

    if state.is_game_over {
        let _ = writeln!(out, "## The End\n\n{}", state.game_over_message);
    }
    out
}

/// Render the chronicle as plain text.
pub fn export_text(state: &GameState) -> String {
    let mut out = String::new();
    let title = format!("The Chronicle of {}", state.character.name);
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
    let _ = writeln!(out, "{}.\n", subtitle(state));

    for entry in &state.chronicle {
        match split_entry(entry) {
            (Some(title), body) => {
                let _ = writeln!(out, "{title}\n{body}\n");
            }
            (None, body) => {
                let _ = writeln!(out, "{body}\n");
            }
        }
    }

    if state.is_game_over {
        let _ = writeln!(out, "{}", state.game_over_message);
    }
    out
}
