#![forbid(unsafe_code)]

//! Keystroke scripts.
//!
//! A script is typed text with `{name}` tokens for special keys, e.g.
//! `"united{downarrow}{enter}"`. `{{}` types a literal `{`.
//!
//! | Token | Key |
//! |---|---|
//! | `{downarrow}` / `{uparrow}` | Down / Up |
//! | `{leftarrow}` / `{rightarrow}` | Left / Right |
//! | `{enter}` | Enter |
//! | `{esc}` | Escape |
//! | `{space}` | Space |
//! | `{tab}` | Tab |
//! | `{backspace}` / `{del}` | Backspace / Delete |
//! | `{home}` / `{end}` | Home / End |

use std::fmt;

use combo_core::event::{Event, KeyCode};

/// Error parsing a keystroke script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// `{name}` is not a known key.
    UnknownToken {
        /// Token text without braces.
        token: String,
        /// Byte offset of the opening brace.
        offset: usize,
    },
    /// A `{` was never closed.
    Unterminated {
        /// Byte offset of the opening brace.
        offset: usize,
    },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownToken { token, offset } => {
                write!(f, "unknown key token {{{token}}} at byte {offset}")
            }
            Self::Unterminated { offset } => {
                write!(f, "unterminated key token at byte {offset}")
            }
        }
    }
}

impl std::error::Error for ScriptError {}

fn token_key(token: &str) -> Option<KeyCode> {
    let code = match token.to_ascii_lowercase().as_str() {
        "downarrow" => KeyCode::Down,
        "uparrow" => KeyCode::Up,
        "leftarrow" => KeyCode::Left,
        "rightarrow" => KeyCode::Right,
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Escape,
        "space" => KeyCode::Char(' '),
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "del" => KeyCode::Delete,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "{" => KeyCode::Char('{'),
        _ => return None,
    };
    Some(code)
}

/// Parse `script` into key press events.
pub fn parse(script: &str) -> Result<Vec<Event>, ScriptError> {
    let mut events = Vec::with_capacity(script.len());
    let mut rest = script.char_indices();

    while let Some((offset, c)) = rest.next() {
        if c != '{' {
            events.push(Event::key(KeyCode::Char(c)));
            continue;
        }
        let mut token = String::new();
        let mut closed = false;
        for (_, t) in rest.by_ref() {
            // `}` only closes a non-empty token.
            if t == '}' && !token.is_empty() {
                closed = true;
                break;
            }
            token.push(t);
        }
        if !closed {
            return Err(ScriptError::Unterminated { offset });
        }
        let code = token_key(&token).ok_or_else(|| ScriptError::UnknownToken {
            token: token.clone(),
            offset,
        })?;
        events.push(Event::key(code));
    }
    Ok(events)
}
