use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::{View, HORIZONTAL_MARGIN, VERTICAL_MARGIN};
use crate::game::GameState;

/// One full-screen state of the game.
pub trait Screen {
    fn render(&self, view: &View, area: Rect, buf: &mut Buffer);
}

pub struct HomeScreen;
pub struct RoundScreen;
pub struct PauseScreen;
pub struct EndScreen;

pub fn current_screen(state: &GameState) -> Box<dyn Screen> {
    match state {
        GameState::Home => Box::new(HomeScreen),
        GameState::Playing(_) => Box::new(RoundScreen),
        GameState::Paused(_) => Box::new(PauseScreen),
        GameState::Ended => Box::new(EndScreen),
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn hint_style() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC)
}

fn hint(key: &str, label: &str, accent: Color) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!("({key}) "), Style::default().fg(accent).add_modifier(Modifier::BOLD)),
        Span::styled(format!("{label}   "), hint_style()),
    ]
}

fn key_name(c: char) -> String {
    match c {
        ' ' => "space".to_string(),
        c => c.to_string(),
    }
}

fn centered_lines(lines: Vec<Line<'static>>, area: Rect, buf: &mut Buffer) {
    let height = lines.len() as u16;
    let [middle] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(middle, buf);
}

impl Screen for HomeScreen {
    fn render(&self, view: &View, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![
            Line::from(Span::styled(
                view.title.clone(),
                bold().fg(view.title_color),
            )),
            Line::from(Span::styled(
                view.author.clone(),
                Style::default().add_modifier(Modifier::DIM),
            )),
            Line::default(),
        ];

        if let Some(highscore) = &view.highscore {
            lines.push(Line::from(Span::styled(highscore.clone(), bold().fg(view.accent))));
            lines.push(Line::default());
        }

        let mut hints = hint("s", &view.start, view.accent);
        hints.extend(hint("q", &view.quit, view.accent));
        lines.push(Line::from(hints));

        centered_lines(lines, area, buf);
    }
}

impl Screen for RoundScreen {
    fn render(&self, view: &View, area: Rect, buf: &mut Buffer) {
        let Some(round) = &view.round else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // status bar
                Constraint::Min(1),    // word
                Constraint::Length(3), // buttons
                Constraint::Length(1), // legend
            ])
            .split(area);

        let [left, center, right] = Layout::horizontal([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .areas(chunks[0]);

        Paragraph::new(Span::styled(view.speed.clone(), bold())).render(left, buf);
        Paragraph::new(Span::styled(
            format!("{}/{}", round.number, round.total),
            Style::default().add_modifier(Modifier::DIM),
        ))
        .alignment(Alignment::Center)
        .render(center, buf);
        if let Some(highscore) = &view.highscore {
            Paragraph::new(Span::styled(highscore.clone(), Style::default().fg(view.accent)))
                .alignment(Alignment::Right)
                .render(right, buf);
        }

        centered_lines(
            vec![Line::from(Span::styled(
                round.label.to_uppercase(),
                bold().fg(round.ink),
            ))],
            chunks[1],
            buf,
        );

        render_buttons(&round.options, chunks[2], buf);

        let legend = Line::from(hint(&key_name(view.pause_key), &view.pause, view.accent));
        Paragraph::new(legend)
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
    }
}

/// Bordered option buttons side by side, labelled with their digit key.
fn render_buttons(options: &[String], area: Rect, buf: &mut Buffer) {
    if options.is_empty() {
        return;
    }

    let labels: Vec<String> = options
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{} {}", i + 1, name))
        .collect();
    let widest = labels.iter().map(|l| l.width()).max().unwrap_or(0) as u16 + 4;

    let constraints = vec![Constraint::Length(widest); labels.len()];
    let buttons = Layout::horizontal(constraints)
        .flex(Flex::SpaceAround)
        .split(area);

    for (label, rect) in labels.into_iter().zip(buttons.iter()) {
        Paragraph::new(Span::styled(label, bold()))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            )
            .render(*rect, buf);
    }
}

impl Screen for PauseScreen {
    fn render(&self, view: &View, area: Rect, buf: &mut Buffer) {
        RoundScreen.render(view, area, buf);

        let [popup] = Layout::vertical([Constraint::Length(10)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::horizontal([Constraint::Percentage(50)])
            .flex(Flex::Center)
            .areas(popup);

        Clear.render(popup, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(view.accent));
        let inner = block.inner(popup);
        block.render(popup, buf);

        centered_lines(
            vec![
                Line::from(Span::styled(view.pause.clone(), bold().fg(view.accent))),
                Line::default(),
                Line::from(hint(&key_name(view.pause_key), &view.resume, view.accent)),
                Line::from(hint("r", &view.restart, view.accent)),
                Line::from(hint("h", &view.home, view.accent)),
                Line::from(hint("q", &view.quit, view.accent)),
            ],
            inner,
            buf,
        );
    }
}

impl Screen for EndScreen {
    fn render(&self, view: &View, area: Rect, buf: &mut Buffer) {
        let Some(end) = &view.end else {
            return;
        };

        let headline_color = if end.new_highscore {
            view.accent
        } else if end.won {
            Color::Green
        } else {
            Color::Red
        };

        let mut lines = vec![
            Line::from(Span::styled(end.headline.clone(), bold().fg(headline_color))),
            Line::default(),
            Line::from(Span::styled(end.speed.clone(), bold())),
            Line::from(Span::styled(end.correct.clone(), bold())),
        ];
        if let Some(summary) = &end.summary {
            lines.push(Line::from(Span::styled(
                summary.clone(),
                Style::default().fg(Color::Cyan),
            )));
        }
        if let Some(highscore) = &view.highscore {
            lines.push(Line::from(Span::styled(
                highscore.clone(),
                Style::default().fg(view.accent),
            )));
        }
        lines.push(Line::default());

        let mut hints = hint("r", &view.restart, view.accent);
        hints.extend(hint("h", &view.home, view.accent));
        hints.extend(hint("q", &view.quit, view.accent));
        lines.push(Line::from(hints));

        centered_lines(lines, area, buf);
    }
}
