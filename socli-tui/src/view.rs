use crate::styles;
use crate::transcript::{TranscriptLine, footer_line, heading, screen_lines};
use ratatui::{
    Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use socli_browse::Screen;
use std::io;
use textwrap::wrap;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Draw `screen` scrolled `scroll` rows from the top. Returns the scroll
/// offset actually used, clamped to the content.
pub fn draw<B: Backend>(term: &mut Terminal<B>, screen: &Screen<'_>, scroll: usize) -> io::Result<usize> {
    let mut used = scroll;
    term.draw(|frame| {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(area);

        // Header
        let title = fit_width(&heading(screen), layout[0].width.saturating_sub(2) as usize);
        let header = Paragraph::new(Line::from(vec![Span::styled(
            format!(" {title} "),
            styles::header(),
        )]));
        frame.render_widget(header, layout[0]);

        // Body
        let visible_h = layout[1].height.saturating_sub(2) as usize;
        let content_width = layout[1].width.saturating_sub(2) as usize;
        let wrapped = wrap_lines(&screen_lines(screen), content_width);
        let total = wrapped.len();
        used = scroll.min(total.saturating_sub(visible_h));
        let end = (used + visible_h).min(total);

        let items: Vec<ListItem> = wrapped[used..end]
            .iter()
            .map(|(text, style)| ListItem::new(Line::from(Span::styled(text.clone(), *style))))
            .collect();
        let body = List::new(items).block(Block::default().borders(Borders::ALL).title(" socli "));
        frame.render_widget(body, layout[1]);

        // Footer
        let footer = footer_line(screen.footer);
        let status = Paragraph::new(Line::from(Span::styled(
            footer.text,
            styles::for_role(footer.role),
        )))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(status, layout[2]);
    })?;

    Ok(used)
}

/// Truncate to at most `width` display columns.
fn fit_width(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn wrap_lines(lines: &[TranscriptLine], width: usize) -> Vec<(String, Style)> {
    let effective_width = width.max(1);
    let mut out = Vec::new();

    for entry in lines {
        let style = styles::for_role(entry.role);
        if entry.text.is_empty() {
            out.push((String::new(), style));
            continue;
        }

        for raw_line in entry.text.split('\n') {
            if raw_line.trim().is_empty() {
                out.push((String::new(), style));
                continue;
            }
            out.extend(
                wrap(raw_line, effective_width)
                    .into_iter()
                    .map(|seg| (seg.into_owned(), style)),
            );
        }
    }

    out
}
