use crate::view;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Stylize,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use socli_browse::{BrowserSession, ExitReason, ExternalBrowser, Input, Step};
use socli_common::{Result, SocliError};
use socli_search::QuestionLoader;
use std::io::{self, Stdout};

const PAGE: usize = 10;

/// What a key press does in the full-screen front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    ScrollUp(usize),
    ScrollDown(usize),
    Dispatch(Input),
}

fn key_action(key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Up => KeyAction::ScrollUp(1),
        KeyCode::Down => KeyAction::ScrollDown(1),
        KeyCode::PageUp => KeyAction::ScrollUp(PAGE),
        KeyCode::PageDown => KeyAction::ScrollDown(PAGE),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            KeyAction::Dispatch(Input::Other)
        }
        KeyCode::Char(ch) => KeyAction::Dispatch(Input::from_char(ch)),
        _ => KeyAction::Dispatch(Input::Other),
    }
}

/// Raw mode and the alternate screen, undone on drop so every exit path
/// leaves the terminal usable.
struct TerminalGuard {
    term: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            disable_raw_mode().ok();
            return Err(e);
        }
        let mut term = Terminal::new(CrosstermBackend::new(stdout))?;
        term.clear()?;
        Ok(Self { term })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        disable_raw_mode().ok();
        let _ = execute!(self.term.backend_mut(), LeaveAlternateScreen);
        let _ = self.term.show_cursor();
    }
}

/// Full-screen front end. Returns how the session ended.
pub async fn run_interactive<L, B>(session: &mut BrowserSession<L, B>) -> Result<ExitReason>
where
    L: QuestionLoader,
    B: ExternalBrowser,
{
    let guard = TerminalGuard::enter().inspect_err(|e| {
        tracing::warn!(error = %e, "tui.terminal.enter_failed");
    })?;
    tracing::debug!("tui.interactive.start");
    let outcome = event_loop(guard, session).await;
    if let Err(e) = &outcome {
        tracing::warn!(error = %e, "tui.interactive.error");
    }
    if let Ok(ExitReason::NoMoreAnswers) = outcome {
        println!("{}", session.footer().text.as_str().yellow());
    }
    outcome
}

async fn event_loop<L, B>(mut guard: TerminalGuard, session: &mut BrowserSession<L, B>) -> Result<ExitReason>
where
    L: QuestionLoader,
    B: ExternalBrowser,
{
    let mut scroll = 0usize;
    loop {
        scroll = view::draw(&mut guard.term, &session.screen(), scroll)?;

        let ev = tokio::task::spawn_blocking(event::read)
            .await
            .map_err(|e| SocliError::Terminal(io::Error::other(e)))??;
        let Event::Key(key) = ev else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let input = match key_action(key) {
            KeyAction::ScrollUp(rows) => {
                scroll = scroll.saturating_sub(rows);
                continue;
            }
            KeyAction::ScrollDown(rows) => {
                scroll += rows;
                continue;
            }
            KeyAction::Dispatch(input) => input,
        };
        tracing::debug!(?input, "tui.key.dispatch");

        let before = session.state();
        match session.handle(input).await? {
            Step::Exit(reason) => return Ok(reason),
            Step::Continue => {
                if session.state() != before {
                    scroll = 0;
                }
            }
        }
    }
}
