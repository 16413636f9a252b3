//! `--index N`: print one result without browsing.

use crossterm::style::Stylize;
use socli_common::{Provider, SocliError};
use socli_search::{QuestionLoader, QuestionView, SearchResolver};
use std::io::{self, Write};

const COUNT_HINT: &str =
    "Count starts from 1. Use: \"socli -i 2 python for loop\" for the 2nd result for the query";

/// Resolve `query`, load the `index`-th result (1-based) and print it.
pub async fn print_nth<L, W>(
    resolver: &SearchResolver,
    loader: &L,
    provider: Provider,
    query: &str,
    index: i64,
    cap: usize,
    out: &mut W,
) -> Result<(), SocliError>
where
    L: QuestionLoader,
    W: Write,
{
    let Some(position) = usize::try_from(index).ok().and_then(|n| n.checked_sub(1)) else {
        writeln!(out, "{}", COUNT_HINT.yellow())?;
        return Ok(());
    };

    let list = resolver.resolve(provider, query, cap).await?;
    let Some(url) = list.content_url(position) else {
        return Err(SocliError::IndexOutOfRange {
            index: position + 1,
            available: list.len(),
        });
    };
    tracing::info!(index, %url, "manual.selected");

    let view = loader.load(&url).await?;
    print_question(out, &view)?;
    Ok(())
}

fn print_question<W: Write>(out: &mut W, view: &QuestionView) -> io::Result<()> {
    writeln!(out, "{}", view.title.as_str().bold())?;
    writeln!(out, "{}", view.stats.as_str().dark_grey())?;
    writeln!(out, "{}", view.url.as_str().blue())?;
    writeln!(out)?;
    writeln!(out, "{}", view.body)?;
    writeln!(out)?;
    writeln!(out, "{}", "Answer:".green().bold())?;
    writeln!(out, "-------")?;
    writeln!(out, "{}", view.answers.first().map(String::as_str).unwrap_or_default())?;
    writeln!(out, "-------")
}
