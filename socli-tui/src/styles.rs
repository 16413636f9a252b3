use crate::transcript::Role;
use ratatui::style::{Color, Modifier, Style};

pub fn header() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn for_role(role: Role) -> Style {
    match role {
        Role::Heading => Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
        Role::Number => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        Role::Tag => Style::default().fg(Color::Blue),
        Role::Stats | Role::Hint => Style::default().fg(Color::DarkGray),
        Role::Body => Style::default().fg(Color::White),
        Role::AnswerHeader => Style::default()
            .fg(Color::LightGreen)
            .add_modifier(Modifier::BOLD),
        Role::Answer => Style::default().fg(Color::LightGreen),
        Role::Warning => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}
