use socli_browse::{Footer, Screen, Tone, View};
use socli_search::{QuestionView, ResultList};

/// What a line is, independent of how a front end colours it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Heading,
    Number,
    Tag,
    Stats,
    Body,
    AnswerHeader,
    Answer,
    Hint,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub text: String,
    pub role: Role,
}

impl TranscriptLine {
    pub fn new(text: impl Into<String>, role: Role) -> Self {
        Self {
            text: text.into(),
            role,
        }
    }

    fn blank() -> Self {
        Self::new(String::new(), Role::Body)
    }
}

/// Body lines for the current screen. Multi-line text is kept as one entry;
/// front ends split and wrap it.
pub fn screen_lines(screen: &Screen<'_>) -> Vec<TranscriptLine> {
    match screen.view {
        View::Results(list) => result_lines(list),
        View::Question { question, cursor } => question_lines(question, cursor),
        View::Closed => Vec::new(),
    }
}

pub fn footer_line(footer: &Footer) -> TranscriptLine {
    let role = match footer.tone {
        Tone::Hint => Role::Hint,
        Tone::Warning => Role::Warning,
    };
    TranscriptLine::new(footer.text.clone(), role)
}

/// One-line title for the header bar.
pub fn heading(screen: &Screen<'_>) -> String {
    match screen.view {
        View::Results(list) => format!(
            "Select a question below ({} results via {})",
            list.len(),
            list.provider
        ),
        View::Question { question, .. } => question.title.clone(),
        View::Closed => String::new(),
    }
}

fn result_lines(list: &ResultList) -> Vec<TranscriptLine> {
    let mut out = Vec::with_capacity(list.len() * 4);
    for (i, record) in list.records.iter().enumerate() {
        out.push(TranscriptLine::new(format!("{i}. {}", record.title), Role::Number));
        if !record.tags.is_empty() {
            let tags: Vec<String> = record.tags.iter().map(|t| format!("[{t}]")).collect();
            out.push(TranscriptLine::new(tags.join(" "), Role::Tag));
        }
        if !record.summary.is_empty() {
            out.push(TranscriptLine::new(record.summary.clone(), Role::Body));
        }
        out.push(TranscriptLine::blank());
    }
    out
}

fn question_lines(question: &QuestionView, cursor: usize) -> Vec<TranscriptLine> {
    let total = question.answers.len();
    let answer = question.answers.get(cursor).map(String::as_str).unwrap_or_default();
    vec![
        TranscriptLine::new(question.title.clone(), Role::Heading),
        TranscriptLine::new(question.stats.clone(), Role::Stats),
        TranscriptLine::blank(),
        TranscriptLine::new(question.body.clone(), Role::Body),
        TranscriptLine::blank(),
        TranscriptLine::new(format!("Answer {} of {total}:", cursor + 1), Role::AnswerHeader),
        TranscriptLine::new(answer, Role::Answer),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use socli_common::Provider;
    use socli_search::ResultRecord;

    fn list() -> ResultList {
        ResultList {
            provider: Provider::StackOverflow,
            site: "https://stackoverflow.com".into(),
            records: vec![
                ResultRecord {
                    title: "How to sort a Vec?".into(),
                    summary: "I have a vector".into(),
                    target_ref: "/questions/1/sort".into(),
                    tags: vec!["rust".into(), "sorting".into()],
                },
                ResultRecord {
                    title: "Reverse a string".into(),
                    summary: String::new(),
                    target_ref: "/questions/2/rev".into(),
                    tags: vec![],
                },
            ],
        }
    }

    #[test]
    fn result_list_is_numbered_from_zero() {
        let results = list();
        let footer = Footer {
            text: "hint".into(),
            tone: Tone::Hint,
        };
        let screen = Screen {
            view: View::Results(&results),
            footer: &footer,
        };
        let lines = screen_lines(&screen);
        assert_eq!(lines[0], TranscriptLine::new("0. How to sort a Vec?", Role::Number));
        assert_eq!(lines[1].text, "[rust] [sorting]");
        assert_eq!(lines[2].text, "I have a vector");
        assert!(lines.iter().any(|l| l.text == "1. Reverse a string"));
        assert!(heading(&screen).contains("2 results via stackoverflow"));
    }

    #[test]
    fn question_screen_shows_current_answer() {
        let q = QuestionView {
            url: "https://stackoverflow.com/questions/1".into(),
            title: "Title".into(),
            body: "Body".into(),
            stats: "Votes 2 | asked today".into(),
            answers: vec!["first".into(), "second".into()],
        };
        let footer = Footer {
            text: "careful".into(),
            tone: Tone::Warning,
        };
        let screen = Screen {
            view: View::Question {
                question: &q,
                cursor: 1,
            },
            footer: &footer,
        };
        let lines = screen_lines(&screen);
        assert_eq!(lines[5].text, "Answer 2 of 2:");
        assert_eq!(lines[6], TranscriptLine::new("second", Role::Answer));
        assert_eq!(footer_line(&footer).role, Role::Warning);
        assert_eq!(heading(&screen), "Title");
    }
}
