//! Result browsing for socli.
//!
//! [`BrowserSession`] is the state machine both front ends drive. It owns
//! the result list, a [`QuestionCache`] and the current view. Front ends
//! translate keys into [`Input`] values, call [`BrowserSession::handle`] and
//! render [`BrowserSession::screen`]; they never change state themselves.

pub mod browser;
pub mod cache;
mod session;

pub use browser::{ExternalBrowser, SystemBrowser};
pub use cache::{CACHE_SLOTS, QuestionCache};
pub use session::{BrowserSession, BrowserState, ExitReason, Footer, Screen, Step, Tone, View};

/// A state-machine input. Scrolling is not one; it belongs to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Digit `0-9`.
    Select(usize),
    NextAnswer,
    PreviousAnswer,
    OpenInBrowser,
    /// Question view back to the result list.
    BackToList,
    Other,
}

impl Input {
    pub fn from_char(ch: char) -> Self {
        match ch {
            '0'..='9' => Self::Select(ch as usize - '0' as usize),
            'n' | 'N' => Self::NextAnswer,
            'b' | 'B' => Self::PreviousAnswer,
            'o' | 'O' => Self::OpenInBrowser,
            'l' | 'L' => Self::BackToList,
            _ => Self::Other,
        }
    }

    /// Line front end: the first non-blank character decides. An empty line
    /// counts as "other".
    pub fn from_line(line: &str) -> Self {
        line.trim().chars().next().map_or(Self::Other, Self::from_char)
    }
}
