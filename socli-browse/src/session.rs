use crate::Input;
use crate::browser::ExternalBrowser;
use crate::cache::QuestionCache;
use socli_common::SocliError;
use socli_search::{QuestionLoader, QuestionView, ResultList};

const NO_MORE_ANSWERS: &str = "No more answers found for this question. Exiting...";
const FIRST_ANSWER: &str = "You can't go further back. You are on the first answer!";
const QUESTION_KEYS: &str =
    "n: next answer  b: previous answer  o: open in browser  l: results  other: quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserState {
    ResultList,
    QuestionDisplay { index: usize, cursor: usize },
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    UserQuit,
    NoMoreAnswers,
}

/// Outcome of one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Exit(ExitReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Hint,
    Warning,
}

/// Status line under the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    pub text: String,
    pub tone: Tone,
}

impl Footer {
    fn hint(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Hint,
        }
    }

    fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Warning,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum View<'a> {
    Results(&'a ResultList),
    Question {
        question: &'a QuestionView,
        cursor: usize,
    },
    Closed,
}

/// Everything a front end needs to draw the current state.
#[derive(Debug, Clone, Copy)]
pub struct Screen<'a> {
    pub view: View<'a>,
    pub footer: &'a Footer,
}

pub struct BrowserSession<L, B> {
    results: ResultList,
    cache: QuestionCache,
    state: BrowserState,
    footer: Footer,
    loader: L,
    browser: B,
}

impl<L, B> BrowserSession<L, B>
where
    L: QuestionLoader,
    B: ExternalBrowser,
{
    pub fn new(results: ResultList, loader: L, browser: B) -> Self {
        let footer = Footer::hint(list_hint(&results));
        Self {
            results,
            cache: QuestionCache::new(),
            state: BrowserState::ResultList,
            footer,
            loader,
            browser,
        }
    }

    pub fn state(&self) -> BrowserState {
        self.state
    }

    pub fn results(&self) -> &ResultList {
        &self.results
    }

    pub fn cache(&self) -> &QuestionCache {
        &self.cache
    }

    pub fn footer(&self) -> &Footer {
        &self.footer
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    pub fn screen(&self) -> Screen<'_> {
        let view = match self.state {
            BrowserState::ResultList => View::Results(&self.results),
            BrowserState::QuestionDisplay { index, cursor } => match self.cache.get(index) {
                Some(question) => View::Question { question, cursor },
                None => View::Closed,
            },
            BrowserState::Exit => View::Closed,
        };
        Screen {
            view,
            footer: &self.footer,
        }
    }

    /// Apply one input. A loader failure ends the session and is returned
    /// for the entry point to report.
    pub async fn handle(&mut self, input: Input) -> Result<Step, SocliError> {
        let from = self.state;
        let step = match (self.state, input) {
            (BrowserState::Exit, _) => Step::Exit(ExitReason::UserQuit),
            (BrowserState::ResultList, Input::Select(index)) => self.select(index).await?,
            (BrowserState::QuestionDisplay { index, cursor }, Input::NextAnswer) => {
                self.next_answer(index, cursor)
            }
            (BrowserState::QuestionDisplay { index, cursor }, Input::PreviousAnswer) => {
                if cursor == 0 {
                    self.footer = Footer::warning(FIRST_ANSWER);
                } else {
                    self.show(index, cursor - 1);
                }
                Step::Continue
            }
            (BrowserState::QuestionDisplay { index, .. }, Input::OpenInBrowser) => {
                self.open_in_browser(index);
                Step::Continue
            }
            (BrowserState::QuestionDisplay { .. }, Input::BackToList) => {
                self.state = BrowserState::ResultList;
                self.footer = Footer::hint(list_hint(&self.results));
                Step::Continue
            }
            _ => self.exit(ExitReason::UserQuit),
        };
        tracing::debug!(?from, ?input, to = ?self.state, "browse.transition");
        Ok(step)
    }

    async fn select(&mut self, index: usize) -> Result<Step, SocliError> {
        if index >= self.results.len() {
            self.footer = Footer::warning(range_warning(self.results.len()));
            return Ok(Step::Continue);
        }
        if self.cache.get(index).is_some() {
            tracing::debug!(index, "browse.cache.hit");
        } else {
            let Some(url) = self.results.content_url(index) else {
                self.footer = Footer::warning(range_warning(self.results.len()));
                return Ok(Step::Continue);
            };
            tracing::debug!(index, %url, "browse.cache.miss");
            let view = match self.loader.load(&url).await {
                Ok(view) => view,
                Err(err) => {
                    self.state = BrowserState::Exit;
                    return Err(err.into());
                }
            };
            self.cache.insert(index, view);
        }
        // Indices past the cache are never stored and cannot be shown.
        if self.cache.get(index).is_none() {
            self.footer = Footer::warning(range_warning(self.results.len()));
            return Ok(Step::Continue);
        }
        self.show(index, 0);
        Ok(Step::Continue)
    }

    fn next_answer(&mut self, index: usize, cursor: usize) -> Step {
        let available = self.cache.get(index).map_or(0, |q| q.answers.len());
        if cursor + 1 < available {
            self.show(index, cursor + 1);
            Step::Continue
        } else {
            self.footer = Footer::warning(NO_MORE_ANSWERS);
            self.exit(ExitReason::NoMoreAnswers)
        }
    }

    fn open_in_browser(&mut self, index: usize) {
        let Some(url) = self.cache.get(index).map(|q| q.url.clone()) else {
            return;
        };
        self.footer = match self.browser.open(&url) {
            Ok(()) => Footer::hint(format!("Opened {url}")),
            Err(e) => {
                tracing::warn!(%url, error = %e, "browse.open_failed");
                Footer::warning(format!("Could not open a browser: {e}"))
            }
        };
    }

    fn show(&mut self, index: usize, cursor: usize) {
        self.state = BrowserState::QuestionDisplay { index, cursor };
        let total = self.cache.get(index).map_or(0, |q| q.answers.len());
        self.footer = Footer::hint(format!("Answer {}/{}  {QUESTION_KEYS}", cursor + 1, total));
    }

    fn exit(&mut self, reason: ExitReason) -> Step {
        self.state = BrowserState::Exit;
        Step::Exit(reason)
    }
}

fn range_warning(len: usize) -> String {
    format!(
        "Question numbers range from 0-{}. Please select a valid question number.",
        len.saturating_sub(1)
    )
}

fn list_hint(results: &ResultList) -> String {
    format!(
        "Select a question (0-{}), any other key to quit",
        results.len().min(crate::CACHE_SLOTS).saturating_sub(1)
    )
}
