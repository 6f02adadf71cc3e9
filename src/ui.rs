use std::fmt::Display;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use typetuto::{session::SlotState, Language, Report, TimeMode, WordMode};
use unicode_width::UnicodeWidthStr;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

pub const TITLE: &str = "typetuto";
pub const SUBTITLE: &str = "start typing, and the game starts";
pub const LEGEND: &str = "F1 mode   F2 language   F3 time   ctrl+r restart   esc quit";

/// Text of the stats panel, either the waiting state or the last finished run.
pub fn stats_line(report: Option<&Report>) -> String {
    match report {
        None => "WPM: -  Correct: -  Wrong: -  Accuracy: -  Rank: waiting for game end".to_string(),
        Some(r) => format!(
            "WPM: {:.0}  Correct: {}  Wrong: {}  Accuracy: {:.1}%  Rank: {:.2}% ({})",
            r.wpm, r.correct_count, r.wrong_count, r.accuracy, r.combined_score, r.rank
        ),
    }
}

/// Lines a row takes when word-wrapped to `width` columns. Words longer than
/// a line are broken across lines.
pub fn wrapped_line_count(row: &str, width: usize) -> u16 {
    let width = width.max(1);
    let mut lines = 1usize;
    let mut used = 0usize;

    for word in row.split(' ') {
        let word_width = word.width();
        if used > 0 && used + 1 + word_width <= width {
            used += 1 + word_width;
            continue;
        }
        if used > 0 {
            lines += 1;
        }
        if word_width > width {
            let extra = (word_width - 1) / width;
            lines += extra;
            used = word_width - extra * width;
        } else {
            used = word_width;
        }
    }

    u16::try_from(lines).unwrap_or(u16::MAX)
}

fn option_spans<T: PartialEq + Display>(
    all: &[T],
    active: &T,
    active_style: Style,
    idle_style: Style,
) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(all.len() * 2);
    for (i, choice) in all.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if choice == active {
            active_style
        } else {
            idle_style
        };
        spans.push(Span::styled(format!(" {choice} "), style));
    }
    spans
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = &self.snapshot;
        let options = self.options();

        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);

        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);

        let underlined_dim_bold_style = Style::default()
            .patch(dim_bold_style)
            .add_modifier(Modifier::UNDERLINED);

        let active_style = Style::default()
            .patch(bold_style)
            .fg(Color::Black)
            .bg(Color::Yellow);

        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let widest_row = snapshot.rows.iter().map(|r| r.width()).max().unwrap_or(0);
        let fits_on_line = widest_row <= max_chars_per_line as usize;
        let rows_height = snapshot
            .rows
            .iter()
            .map(|row| wrapped_line_count(row, max_chars_per_line as usize))
            .fold(0u16, u16::saturating_add);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),           // title
                Constraint::Length(1),           // subtitle
                Constraint::Length(1),           // padding
                Constraint::Length(1),           // options
                Constraint::Min(1),              // padding
                Constraint::Length(1),           // timer
                Constraint::Length(1),           // padding
                Constraint::Length(rows_height), // rows
                Constraint::Min(1),              // padding
                Constraint::Length(1),           // stats
                Constraint::Length(1),           // padding
                Constraint::Length(1),           // legend
                Constraint::Length(1),           // notice
            ])
            .split(area);

        Paragraph::new(Span::styled(TITLE, bold_style))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);
        Paragraph::new(Span::styled(SUBTITLE, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let mut nav = option_spans(
            &WordMode::ALL,
            &options.word_mode,
            active_style,
            dim_bold_style,
        );
        nav.push(Span::raw("   "));
        nav.extend(option_spans(
            &Language::ALL,
            &options.language,
            active_style,
            dim_bold_style,
        ));
        nav.push(Span::raw("   "));
        nav.extend(option_spans(
            &TimeMode::ALL,
            &options.time_mode,
            active_style,
            dim_bold_style,
        ));
        Paragraph::new(Line::from(nav))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        Paragraph::new(Span::styled(
            snapshot.remaining_secs.to_string(),
            dim_bold_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

        let starts = snapshot.row_starts();
        let lines: Vec<Line> = snapshot
            .rows
            .iter()
            .zip(starts)
            .map(|(row, start)| {
                let spans: Vec<Span> = row
                    .chars()
                    .enumerate()
                    .map(|(offset, expected)| {
                        let idx = start + offset;
                        let state = snapshot.state.get(idx).copied().unwrap_or_default();
                        match state {
                            SlotState::Wrong => {
                                let typed = snapshot.shown.get(idx).copied().unwrap_or(expected);
                                Span::styled(
                                    match typed {
                                        ' ' => "·".to_owned(),
                                        c => c.to_string(),
                                    },
                                    red_bold_style,
                                )
                            }
                            SlotState::Correct => {
                                Span::styled(expected.to_string(), green_bold_style)
                            }
                            SlotState::Pending if snapshot.running && idx == snapshot.cursor => {
                                Span::styled(expected.to_string(), underlined_dim_bold_style)
                            }
                            SlotState::Pending => {
                                Span::styled(expected.to_string(), dim_bold_style)
                            }
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .alignment(if fits_on_line {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: false })
            .render(chunks[7], buf);

        let stats_style = if self.last_report.is_some() {
            bold_style
        } else {
            italic_style
        };
        Paragraph::new(Span::styled(stats_line(self.last_report.as_ref()), stats_style))
            .alignment(Alignment::Center)
            .render(chunks[9], buf);

        Paragraph::new(Span::styled(LEGEND, italic_style.add_modifier(Modifier::DIM)))
            .alignment(Alignment::Center)
            .render(chunks[11], buf);

        if let Some(notice) = &self.notice {
            Paragraph::new(Span::styled(notice.as_str(), Style::default().fg(Color::Red)))
                .alignment(Alignment::Center)
                .render(chunks[12], buf);
        }
    }
}
