//! TUI rendering for Mind Reader using ratatui.

mod input;
mod keypad;
mod theme;
mod ui_inline;

pub use input::{InputPump, apply_event, handle_events};
pub use keypad::{KEYPAD_HEIGHT, KeypadLayout};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};
pub use ui_inline::{INLINE_VIEWPORT_HEIGHT, InlineOutput, clear_inline_viewport, draw as draw_inline};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use mindreader_engine::{App, CoordinatorSnapshot, HISTORY_CAPACITY, Predictor, Round, Status};
use mindreader_types::ui::UiOptions;

const ASCII_BORDER: border::Set = border::Set {
    top_left: "+",
    top_right: "+",
    bottom_left: "+",
    bottom_right: "+",
    vertical_left: "|",
    vertical_right: "|",
    horizontal_top: "-",
    horizontal_bottom: "-",
};

/// Main draw function. Returns where the keypad buttons landed so clicks can
/// be mapped back to actions.
pub fn draw<P: Predictor + 'static>(frame: &mut Frame, app: &App<P>) -> KeypadLayout {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    let snapshot = app.snapshot();

    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),             // Title
            Constraint::Length(3),             // Scoreboard
            Constraint::Length(1),             // Status
            Constraint::Length(1),             // Spacer
            Constraint::Length(KEYPAD_HEIGHT), // Keypad
            Constraint::Min(3),                // History
            Constraint::Length(1),             // Footer
        ])
        .split(frame.area());

    draw_title(frame, chunks[0], &palette);
    draw_scoreboard(frame, &snapshot, chunks[1], &palette, &glyphs, options);
    draw_status_line(frame, app, &snapshot.status, chunks[2], &palette, &glyphs);
    let keypad = KeypadLayout::compute(chunks[4]);
    draw_keypad(frame, &keypad, !snapshot.phase.is_busy(), &palette, options);
    draw_history(frame, app, &snapshot.history, chunks[5], &palette, &glyphs, options);
    draw_footer(frame, app, &snapshot.status, chunks[6], &palette, &glyphs);

    keypad
}

fn panel_block(options: UiOptions, palette: &Palette) -> Block<'static> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.bg_border))
        .style(Style::default().bg(palette.bg_dark));
    if options.ascii_only {
        block.border_set(ASCII_BORDER)
    } else {
        block.border_type(BorderType::Rounded)
    }
}

fn draw_title(frame: &mut Frame, area: Rect, palette: &Palette) {
    let lines = vec![
        Line::from(Span::styled("MIND READER", styles::title(palette))),
        Line::from(Span::styled(
            "Pick a number from 1 to 8. The AI tries to predict it first.",
            Style::default().fg(palette.text_secondary),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_scoreboard(
    frame: &mut Frame,
    snapshot: &CoordinatorSnapshot,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    options: UiOptions,
) {
    let score = snapshot.score;
    let mut spans = vec![
        Span::styled(format!("{} AI  ", glyphs.ai), Style::default().fg(palette.ai_win)),
        Span::styled(
            score.ai.to_string(),
            Style::default()
                .fg(palette.ai_win)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   {}   ", glyphs.separator),
            Style::default().fg(palette.text_muted),
        ),
        Span::styled(
            format!("{} You  ", glyphs.human),
            Style::default().fg(palette.human_win),
        ),
        Span::styled(
            score.human.to_string(),
            Style::default()
                .fg(palette.human_win)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(rate) = score.ai_hit_rate() {
        spans.push(Span::styled(
            format!("   {}   AI hit rate {:.0}%", glyphs.separator, rate * 100.0),
            Style::default().fg(palette.text_muted),
        ));
    }

    let block = panel_block(options, palette).title(" Score ");
    let scoreboard = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(scoreboard, area);
}

/// Text and style for the one-line status readout.
pub(crate) fn status_line(
    status: &Status,
    busy: bool,
    tick: usize,
    palette: &Palette,
    glyphs: &Glyphs,
    options: UiOptions,
) -> Line<'static> {
    let (prefix, style) = match status {
        Status::Querying if busy => (
            spinner_frame(tick, options),
            Style::default().fg(palette.primary),
        ),
        Status::Querying | Status::Waiting => {
            (glyphs.status_ready, Style::default().fg(palette.text_muted))
        }
        Status::Resolved { winner, .. } => (
            glyphs.bullet,
            Style::default()
                .fg(palette.winner(*winner))
                .add_modifier(Modifier::BOLD),
        ),
        Status::Failed { .. } => (glyphs.status_missing, Style::default().fg(palette.error)),
    };
    Line::from(vec![
        Span::styled(format!("{prefix} "), style),
        Span::styled(status.to_string(), style),
    ])
}

fn draw_status_line<P: Predictor + 'static>(
    frame: &mut Frame,
    app: &App<P>,
    status: &Status,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let line = status_line(
        status,
        app.is_busy(),
        app.tick_count(),
        palette,
        glyphs,
        app.ui_options(),
    );
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_keypad(
    frame: &mut Frame,
    keypad: &KeypadLayout,
    enabled: bool,
    palette: &Palette,
    options: UiOptions,
) {
    let style = styles::key_button(palette, enabled);
    for (action, rect) in keypad.iter() {
        if rect.is_empty() {
            continue;
        }
        let block = panel_block(options, palette)
            .border_style(style)
            .style(style);
        let button = Paragraph::new(action.to_string())
            .alignment(Alignment::Center)
            .style(style)
            .block(block);
        frame.render_widget(button, rect);
    }
}

/// One history row: `You 3  AI 5  You Won`.
pub(crate) fn history_line(round: &Round, palette: &Palette, glyphs: &Glyphs) -> Line<'static> {
    let winner = round.winner();
    let mut spans = vec![
        Span::styled(
            format!("{} You {}", glyphs.human, round.human()),
            Style::default().fg(palette.text_primary),
        ),
        Span::styled(
            format!("  {} AI {}", glyphs.ai, round.predicted()),
            Style::default().fg(palette.text_secondary),
        ),
        Span::styled(
            format!("  {}", winner.label()),
            Style::default()
                .fg(palette.winner(winner))
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(confidence) = round.confidence() {
        spans.push(Span::styled(
            format!("  ({confidence})"),
            Style::default().fg(palette.text_muted),
        ));
    }
    Line::from(spans)
}

fn draw_history<P: Predictor + 'static>(
    frame: &mut Frame,
    app: &App<P>,
    history: &[Round],
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    options: UiOptions,
) {
    let block = panel_block(options, palette).title(format!(" Last {HISTORY_CAPACITY} Rounds "));

    let lines: Vec<Line> = if history.is_empty() {
        vec![Line::from(Span::styled(
            "No rounds yet. Press 1-8 or click a button.",
            styles::key_hint(palette),
        ))]
    } else {
        history
            .iter()
            .enumerate()
            .map(|(i, round)| {
                let line = history_line(round, palette, glyphs);
                if i == 0 && app.result_flash_active() {
                    line.style(Style::default().bg(palette.bg_highlight))
                } else {
                    line
                }
            })
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_footer<P: Predictor + 'static>(
    frame: &mut Frame,
    app: &App<P>,
    status: &Status,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let (indicator, indicator_color) = if status.is_error() {
        (glyphs.status_missing, palette.error)
    } else {
        (glyphs.status_ready, palette.accent)
    };
    let sep = Span::styled(
        format!(" {} ", glyphs.separator),
        Style::default().fg(palette.text_muted),
    );
    let footer = Line::from(vec![
        Span::styled(format!("{indicator} "), Style::default().fg(indicator_color)),
        Span::styled(
            app.predictor_label().to_string(),
            Style::default().fg(palette.text_secondary),
        ),
        sep.clone(),
        Span::styled(
            format!("session {}", app.session_token()),
            Style::default().fg(palette.text_muted),
        ),
        sep,
        Span::styled("1-8", styles::key_highlight(palette)),
        Span::styled(" pick  ", styles::key_hint(palette)),
        Span::styled("Tab", styles::key_highlight(palette)),
        Span::styled(" inline  ", styles::key_hint(palette)),
        Span::styled("q", styles::key_highlight(palette)),
        Span::styled(" quit", styles::key_hint(palette)),
    ]);
    frame.render_widget(Paragraph::new(footer), area);
}
