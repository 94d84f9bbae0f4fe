//! Inline TUI mode - minimal viewport for shell integration.
//!
//! Finished rounds scroll into the terminal's own history above the viewport;
//! the viewport itself only holds the status, a one-line keypad and hints.

use ratatui::prelude::{Backend, Terminal};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph, Widget},
};

use mindreader_engine::{App, Predictor};

use crate::keypad::KeypadLayout;
use crate::theme::{glyphs, palette, styles};
use crate::{history_line, status_line};

pub const INLINE_VIEWPORT_HEIGHT: u16 = 3;

/// Tracks which finished rounds have already been printed above the viewport.
#[derive(Debug, Default)]
pub struct InlineOutput {
    flushed_rounds: usize,
}

impl InlineOutput {
    pub fn new() -> Self {
        Self { flushed_rounds: 0 }
    }

    /// Start from the app's current round count, so rounds played in
    /// fullscreen are not replayed after switching modes.
    pub fn resume_from<P: Predictor + 'static>(app: &App<P>) -> Self {
        Self {
            flushed_rounds: app.rounds_played(),
        }
    }

    pub fn flush<B, P>(&mut self, terminal: &mut Terminal<B>, app: &App<P>) -> Result<(), B::Error>
    where
        B: Backend,
        P: Predictor + 'static,
    {
        let options = app.ui_options();
        let palette = palette(options);
        let glyphs = glyphs(options);

        let mut last = self.flushed_rounds;
        let lines: Vec<Line> = app
            .finished_rounds()
            .filter(|(number, _)| *number > self.flushed_rounds)
            .map(|(number, round)| {
                last = last.max(number);
                let mut line = history_line(round, &palette, &glyphs);
                line.spans.insert(
                    0,
                    Span::styled(
                        format!("Round {number:>3}  "),
                        Style::default().fg(palette.text_muted),
                    ),
                );
                line
            })
            .collect();

        self.flushed_rounds = last;
        if lines.is_empty() {
            return Ok(());
        }

        let height = lines.len() as u16;
        terminal.insert_before(height, |buf| {
            Paragraph::new(lines).render(buf.area, buf);
        })?;
        Ok(())
    }
}

pub fn draw<P: Predictor + 'static>(frame: &mut Frame, app: &App<P>) -> KeypadLayout {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    let snapshot = app.snapshot();

    let area = frame.area();
    frame.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let mut status = status_line(
        &snapshot.status,
        snapshot.phase.is_busy(),
        app.tick_count(),
        &palette,
        &glyphs,
        options,
    );
    status.spans.push(Span::styled(
        format!(
            "   AI {} {} You {}",
            snapshot.score.ai, glyphs.separator, snapshot.score.human
        ),
        Style::default().fg(palette.text_secondary),
    ));
    frame.render_widget(Paragraph::new(status), chunks[0]);

    let keypad = KeypadLayout::single_row(chunks[1]);
    let button_style = styles::key_button(&palette, !snapshot.phase.is_busy());
    for (action, rect) in keypad.iter() {
        if rect.is_empty() {
            continue;
        }
        frame.render_widget(
            Paragraph::new(format!("[{action}]")).style(button_style),
            rect,
        );
    }

    let hints = Line::from(vec![
        Span::styled("1-8", styles::key_highlight(&palette)),
        Span::styled(" pick  ", styles::key_hint(&palette)),
        Span::styled("Tab", styles::key_highlight(&palette)),
        Span::styled(" fullscreen  ", styles::key_hint(&palette)),
        Span::styled("q", styles::key_highlight(&palette)),
        Span::styled(" quit", styles::key_hint(&palette)),
    ]);
    frame.render_widget(Paragraph::new(hints), chunks[2]);

    keypad
}

/// Blank the inline viewport before leaving inline mode.
pub fn clear_inline_viewport<B: Backend>(terminal: &mut Terminal<B>) -> Result<(), B::Error> {
    terminal.draw(|frame| frame.render_widget(Clear, frame.area()))?;
    Ok(())
}
