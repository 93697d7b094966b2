#![forbid(unsafe_code)]

//! Conversion from crossterm events to console input.

use crossterm::event as ct;
use xcon::{InputEvent, KeyCode, KeyEvent, KeyEventKind, Modifiers};

fn key_code(code: ct::KeyCode) -> Option<KeyCode> {
    Some(match code {
        ct::KeyCode::Char(c) => KeyCode::Char(c),
        ct::KeyCode::Enter => KeyCode::Enter,
        ct::KeyCode::Esc => KeyCode::Escape,
        ct::KeyCode::Backspace => KeyCode::Backspace,
        ct::KeyCode::Tab => KeyCode::Tab,
        ct::KeyCode::BackTab => KeyCode::BackTab,
        ct::KeyCode::Delete => KeyCode::Delete,
        ct::KeyCode::Insert => KeyCode::Insert,
        ct::KeyCode::Home => KeyCode::Home,
        ct::KeyCode::End => KeyCode::End,
        ct::KeyCode::PageUp => KeyCode::PageUp,
        ct::KeyCode::PageDown => KeyCode::PageDown,
        ct::KeyCode::Up => KeyCode::Up,
        ct::KeyCode::Down => KeyCode::Down,
        ct::KeyCode::Left => KeyCode::Left,
        ct::KeyCode::Right => KeyCode::Right,
        _ => return None,
    })
}

fn modifiers(m: ct::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(ct::KeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if m.contains(ct::KeyModifiers::ALT) {
        out |= Modifiers::ALT;
    }
    if m.contains(ct::KeyModifiers::CONTROL) {
        out |= Modifiers::CTRL;
    }
    if m.contains(ct::KeyModifiers::SUPER) {
        out |= Modifiers::SUPER;
    }
    out
}

fn key_kind(kind: ct::KeyEventKind) -> KeyEventKind {
    match kind {
        ct::KeyEventKind::Press => KeyEventKind::Press,
        ct::KeyEventKind::Repeat => KeyEventKind::Repeat,
        ct::KeyEventKind::Release => KeyEventKind::Release,
    }
}

/// Map a key event. Unsupported keys yield `None`.
#[must_use]
pub fn convert_key(key: ct::KeyEvent) -> Option<KeyEvent> {
    let code = key_code(key.code)?;
    Some(
        KeyEvent::new(code)
            .with_modifiers(modifiers(key.modifiers))
            .with_kind(key_kind(key.kind)),
    )
}

/// Map a terminal event to console input.
///
/// Terminals that do not report key releases never end a held PageUp or
/// PageDown, so when `releases` is false every page key press is followed
/// by a synthesized release.
#[must_use]
pub fn convert(event: ct::Event, releases: bool) -> Vec<InputEvent> {
    match event {
        ct::Event::Key(key) => {
            let Some(key) = convert_key(key) else {
                return Vec::new();
            };
            let is_page = matches!(key.code, KeyCode::PageUp | KeyCode::PageDown);
            if !releases && is_page && key.kind != KeyEventKind::Release {
                let release = key.with_kind(KeyEventKind::Release);
                vec![InputEvent::Key(key), InputEvent::Key(release)]
            } else {
                vec![InputEvent::Key(key)]
            }
        }
        ct::Event::Mouse(mouse) => match mouse.kind {
            ct::MouseEventKind::ScrollUp => vec![InputEvent::Wheel(1)],
            ct::MouseEventKind::ScrollDown => vec![InputEvent::Wheel(-1)],
            _ => Vec::new(),
        },
        ct::Event::Paste(text) => vec![InputEvent::Paste(text)],
        _ => Vec::new(),
    }
}
