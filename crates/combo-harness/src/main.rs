#![forbid(unsafe_code)]

//! Interactive terminal demo.
//!
//! Draws the reference page (heading, combobox, submit button) and feeds
//! real terminal input through the same [`Session`] routing the scenario
//! tests use.
//!
//! Keys: type to filter, arrows to navigate, Enter/Space to pick, Tab to
//! reach the button, Ctrl+S to submit, Ctrl+C or Ctrl+Q to quit.
//!
//! Environment:
//! - `COMBO_ID`, `COMBO_PLACEHOLDER`, `COMBO_MAX_VISIBLE_ROWS`,
//!   `COMBO_SHOW_TOGGLE` configure the widget.
//! - `COMBO_HARNESS_LOG_FILE` enables tracing output to that file, filtered
//!   by `RUST_LOG` (default `debug`).

use std::fs::File;
use std::io::{self, Write};
use std::sync::{Mutex, OnceLock};

use combo_core::event::{Event, KeyCode};
use combo_harness::session::{FIELD_WIDTH, HEADING, SUBMIT_LABEL};
use combo_harness::{PageFocus, Session, view_to_text};
use combo_widgets::ComboboxConfig;
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::{cursor, event as cte, execute, queue, terminal};
use tracing_subscriber::EnvFilter;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const LOG_FILE_ENV: &str = "COMBO_HARNESS_LOG_FILE";
const HELP: &str = "Tab: button  Ctrl+S: submit  Ctrl+Q: quit";

fn main() -> io::Result<()> {
    init_logging()?;
    let config = ComboboxConfig::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    tracing::info!(id = %config.id, rows = config.max_visible_rows, "starting demo");

    let mut session = Session::with_config(config);
    let mut guard = TerminalGuard::enter()?;
    let result = run(&mut session, guard.stdout());
    drop(guard);

    tracing::info!(alerts = session.alerts().len(), "demo finished");
    result
}

fn init_logging() -> io::Result<()> {
    let Some(path) = std::env::var_os(LOG_FILE_ENV) else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))
}

fn run(session: &mut Session, out: &mut impl Write) -> io::Result<()> {
    draw(session, out)?;
    loop {
        let Some(event) = Event::from_crossterm(cte::read()?) else {
            continue;
        };
        if let Event::Key(key) = &event
            && key.is_press()
            && key.ctrl()
        {
            match key.code {
                KeyCode::Char('c' | 'q') => return Ok(()),
                KeyCode::Char('s') => {
                    session.click_submit();
                    draw(session, out)?;
                    continue;
                }
                _ => {}
            }
        }
        session.send(&event);
        draw(session, out)?;
    }
}

fn draw(session: &Session, out: &mut impl Write) -> io::Result<()> {
    let view = session.view();
    let field = Session::field_area();
    let submit = Session::submit_area();
    let heading = Session::heading_area();
    let (_, height) = terminal::size()?;

    queue!(
        out,
        cursor::Hide,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(heading.x, heading.y),
        SetAttribute(Attribute::Bold),
        Print(HEADING),
        SetAttribute(Attribute::Reset),
    )?;

    for (i, line) in view_to_text(&view, FIELD_WIDTH).lines().enumerate() {
        queue!(out, cursor::MoveTo(field.x, field.y + i as u16), Print(line))?;
    }

    queue!(out, cursor::MoveTo(submit.x, submit.y))?;
    if session.focused() == PageFocus::SubmitButton {
        queue!(
            out,
            SetAttribute(Attribute::Reverse),
            Print(SUBMIT_LABEL),
            SetAttribute(Attribute::Reset),
        )?;
    } else {
        queue!(out, Print(SUBMIT_LABEL))?;
    }

    let status = session.alerts().last().map_or(HELP, String::as_str);
    queue!(
        out,
        cursor::MoveTo(0, height.saturating_sub(1)),
        Print(status)
    )?;

    if matches!(session.focused(), PageFocus::Input | PageFocus::Listbox) {
        let combobox = session.combobox();
        let before: String = combobox
            .text()
            .graphemes(true)
            .take(combobox.cursor())
            .collect();
        let caret_max = FIELD_WIDTH.saturating_sub(4);
        let caret = u16::try_from(before.width()).unwrap_or(caret_max).min(caret_max);
        queue!(out, cursor::MoveTo(field.x + caret, field.y), cursor::Show)?;
    }
    out.flush()
}

/// Owns raw mode and the alternate screen; restores both on drop.
struct TerminalGuard {
    stdout: io::Stdout,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        install_panic_hook();
        terminal::enable_raw_mode()?;
        // From here on, drop restores whatever got enabled.
        let mut guard = Self {
            stdout: io::stdout(),
        };
        execute!(
            guard.stdout,
            terminal::EnterAlternateScreen,
            cte::EnableMouseCapture,
            cte::EnableBracketedPaste,
            cte::EnableFocusChange,
        )?;
        tracing::debug!("terminal entered raw mode");
        Ok(guard)
    }

    fn stdout(&mut self) -> &mut io::Stdout {
        &mut self.stdout
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
        tracing::debug!("terminal restored");
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            previous(info);
        }));
    });
}

fn restore_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cte::DisableFocusChange);
    let _ = execute!(stdout, cte::DisableBracketedPaste);
    let _ = execute!(stdout, cte::DisableMouseCapture);
    let _ = execute!(stdout, cursor::Show);
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = stdout.flush();
}
