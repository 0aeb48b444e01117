use keyforge::{
    practice::PracticeMode,
    runtime::Ticker,
    scoring::{CharState, Metrics},
    util::{format_number, format_seconds},
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl<T: Ticker> Widget for &App<T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let practice = &self.practice;
        let metrics = practice.metrics();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let target_width = practice.target().width();
        let prompt_lines = if target_width <= max_chars_per_line as usize {
            1
        } else {
            (target_width as f64 / max_chars_per_line as f64).ceil() as u16 + 1
        };
        let card_lines = match (metrics.is_complete, practice.mode()) {
            (false, _) => 0,
            (true, PracticeMode::Characters) => 5,
            (true, PracticeMode::Paragraph) => 4,
        };
        let padding = area
            .height
            .saturating_sub(prompt_lines + card_lines + 4 + VERTICAL_MARGIN * 2)
            / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),            // row indicator
                Constraint::Length(padding),      // padding
                Constraint::Length(prompt_lines), // target
                Constraint::Length(1),            // padding
                Constraint::Length(1),            // stats
                Constraint::Length(card_lines),   // completion card
                Constraint::Min(0),               // padding
                Constraint::Length(1),            // legend
            ])
            .split(area);

        let indicator = match practice.mode() {
            PracticeMode::Characters => format!(
                "{}   next: {}",
                practice.row_label(),
                practice.next_row_label()
            ),
            PracticeMode::Paragraph => String::from("Paragraph"),
        };
        Paragraph::new(Span::styled(
            indicator,
            Style::default().fg(Color::Cyan).patch(bold_style),
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        Paragraph::new(Line::from(target_spans(self, &metrics)))
            .alignment(if prompt_lines == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true })
            .render(chunks[2], buf);

        Paragraph::new(Span::styled(stats_line(&metrics), dim_bold_style))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);

        if metrics.is_complete {
            let mut lines = vec![Line::from(Span::styled(
                format!(
                    "{} wpm   {}% acc",
                    format_number(metrics.wpm),
                    format_number(metrics.accuracy)
                ),
                Style::default().fg(Color::Green).patch(bold_style),
            ))];
            let title = match practice.mode() {
                PracticeMode::Characters => {
                    lines.push(Line::from(format!(
                        "Next row: {}",
                        practice.next_row_label()
                    )));
                    "Sequence complete!"
                }
                PracticeMode::Paragraph => "Paragraph complete!",
            };
            lines.push(Line::from(Span::styled("(enter) next", italic_style)));

            let card = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title(title))
                .alignment(Alignment::Center);

            card.render(chunks[5], buf);
        }

        let legend = match practice.mode() {
            PracticeMode::Characters => "(tab) paragraph / (ctrl+n) new / (ctrl+r) next row / (esc)ape",
            PracticeMode::Paragraph => "(tab) characters / (ctrl+n) new / (esc)ape",
        };
        Paragraph::new(Span::styled(legend, italic_style)).render(chunks[7], buf);
    }
}

fn target_spans<'a, T: Ticker>(app: &'a App<T>, metrics: &Metrics) -> Vec<Span<'a>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let underlined_dim_bold_style = Style::default()
        .patch(dim_bold_style)
        .add_modifier(Modifier::UNDERLINED);

    let typed: Vec<char> = app.practice.session().typed().chars().collect();

    app.practice
        .target()
        .chars()
        .zip(&metrics.score.char_states)
        .enumerate()
        .map(|(idx, (expected, state))| match state {
            CharState::Correct => Span::styled(expected.to_string(), green_bold_style),
            CharState::Incorrect => Span::styled(
                match typed.get(idx) {
                    Some(' ') => "·".to_owned(),
                    Some(c) => c.to_string(),
                    None => expected.to_string(),
                },
                red_bold_style,
            ),
            CharState::Current => Span::styled(expected.to_string(), underlined_dim_bold_style),
            CharState::Pending => Span::styled(expected.to_string(), dim_bold_style),
        })
        .collect()
}

fn stats_line(metrics: &Metrics) -> String {
    format!(
        "{} wpm   {}% acc   {} errors   {}",
        format_number(metrics.wpm),
        format_number(metrics.accuracy),
        metrics.error_count,
        format_seconds(metrics.elapsed_ms)
    )
}
