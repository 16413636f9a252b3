use crate::transcript::{Role, TranscriptLine, footer_line, heading, screen_lines};
use crossterm::style::{StyledContent, Stylize};
use socli_browse::{BrowserSession, ExitReason, ExternalBrowser, Input, Screen, Step};
use socli_common::Result;
use socli_search::QuestionLoader;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Line-based front end on stdin/stdout, for terminals that cannot be driven
/// full-screen.
pub async fn run_line<L, B>(session: &mut BrowserSession<L, B>) -> Result<ExitReason>
where
    L: QuestionLoader,
    B: ExternalBrowser,
{
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    run_lines(session, stdin, &mut stdout).await
}

/// Drive `session` from `reader`, one input per line, rendering to `out`.
/// End of input counts as quitting.
pub async fn run_lines<L, B, R, W>(
    session: &mut BrowserSession<L, B>,
    reader: R,
    out: &mut W,
) -> Result<ExitReason>
where
    L: QuestionLoader,
    B: ExternalBrowser,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    render(out, &session.screen())?;

    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            return Ok(ExitReason::UserQuit);
        };

        let input = Input::from_line(&line);
        tracing::debug!(?input, "tui.line.dispatch");
        let before = session.state();
        let step = session.handle(input).await?;
        if let Step::Exit(reason) = step {
            if reason == ExitReason::NoMoreAnswers {
                print_line(out, &footer_line(session.footer()))?;
            }
            return Ok(reason);
        }
        if session.state() != before {
            render(out, &session.screen())?;
        } else {
            print_line(out, &footer_line(session.footer()))?;
        }
    }
}

fn render<W: Write>(out: &mut W, screen: &Screen<'_>) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", heading(screen).bold())?;
    writeln!(out)?;
    for line in screen_lines(screen) {
        print_line(out, &line)?;
    }
    print_line(out, &footer_line(screen.footer))
}

fn print_line<W: Write>(out: &mut W, line: &TranscriptLine) -> io::Result<()> {
    writeln!(out, "{}", paint(line))
}

fn paint(line: &TranscriptLine) -> StyledContent<&str> {
    let text = line.text.as_str();
    match line.role {
        Role::Heading => text.bold(),
        Role::Number => text.yellow().bold(),
        Role::Tag => text.blue(),
        Role::Stats | Role::Hint => text.dark_grey(),
        Role::Body => text.stylize(),
        Role::AnswerHeader => text.green().bold(),
        Role::Answer => text.green(),
        Role::Warning => text.red().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use socli_browse::BrowserState;
    use socli_common::Provider;
    use socli_search::{QuestionView, ResultList, ResultRecord, SearchError};
    use std::sync::Mutex;

    struct FixedLoader;

    #[async_trait]
    impl QuestionLoader for FixedLoader {
        async fn load(&self, url: &str) -> std::result::Result<QuestionView, SearchError> {
            Ok(QuestionView {
                url: url.to_string(),
                title: "Picked question".into(),
                body: "The body".into(),
                stats: "Votes 5 | asked today".into(),
                answers: vec!["first answer".into(), "second answer".into()],
            })
        }
    }

    #[derive(Default)]
    struct NoteBrowser(Mutex<Vec<String>>);

    impl ExternalBrowser for NoteBrowser {
        fn open(&self, url: &str) -> io::Result<()> {
            self.0.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    fn session() -> BrowserSession<FixedLoader, NoteBrowser> {
        let results = ResultList {
            provider: Provider::Google,
            site: "https://stackoverflow.com".into(),
            records: (0..3)
                .map(|i| ResultRecord {
                    title: format!("Result {i}"),
                    summary: format!("summary {i}"),
                    target_ref: format!("https://stackoverflow.com/questions/{i}/r"),
                    tags: vec![],
                })
                .collect(),
        };
        BrowserSession::new(results, FixedLoader, NoteBrowser::default())
    }

    async fn drive(script: &str) -> (ExitReason, String, BrowserSession<FixedLoader, NoteBrowser>) {
        let mut s = session();
        let mut out = Vec::new();
        let reason = run_lines(&mut s, script.as_bytes(), &mut out).await.unwrap();
        (reason, String::from_utf8(out).unwrap(), s)
    }

    #[tokio::test]
    async fn paging_through_answers_until_the_end() {
        let (reason, out, _) = drive("1\nn\nn\n").await;
        assert_eq!(reason, ExitReason::NoMoreAnswers);
        assert!(out.contains("Result 2"));
        assert!(out.contains("Picked question"));
        assert!(out.contains("second answer"));
        assert!(out.contains("No more answers found for this question. Exiting..."));
    }

    #[tokio::test]
    async fn warnings_are_printed_in_place() {
        let (reason, out, s) = drive("7\n0\nb\no\n").await;
        assert_eq!(reason, ExitReason::UserQuit);
        assert!(out.contains("Question numbers range from 0-2."));
        assert!(out.contains("You can't go further back. You are on the first answer!"));
        assert_eq!(s.state(), BrowserState::QuestionDisplay { index: 0, cursor: 0 });
        assert_eq!(
            *s.browser().0.lock().unwrap(),
            vec!["https://stackoverflow.com/questions/0/r".to_string()]
        );
    }

    #[tokio::test]
    async fn other_input_quits() {
        let (reason, _, s) = drive("q\n0\n").await;
        assert_eq!(reason, ExitReason::UserQuit);
        assert_eq!(s.state(), BrowserState::Exit);
    }
}
