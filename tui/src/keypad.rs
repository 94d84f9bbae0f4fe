//! Keypad geometry shared by rendering and mouse hit-testing.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use mindreader_types::Action;

pub const KEYPAD_COLUMNS: u16 = 3;
pub const KEYPAD_ROWS: u16 = 3;
pub const BUTTON_HEIGHT: u16 = 3;
pub const KEYPAD_HEIGHT: u16 = KEYPAD_ROWS * BUTTON_HEIGHT;
const KEYPAD_MAX_WIDTH: u16 = 42;
const ROW_BUTTON_WIDTH: u16 = 5;

/// Button rectangles from the most recent frame, in terminal coordinates.
///
/// Rendering records them; the input handler reads them to turn a click into
/// an action. Empty until the first draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeypadLayout {
    buttons: [Rect; Action::ALL.len()],
}

impl KeypadLayout {
    /// Lay the eight buttons out three per row, centered in `area`.
    #[must_use]
    pub fn compute(area: Rect) -> Self {
        let width = area.width.min(KEYPAD_MAX_WIDTH);
        let keypad = Rect {
            x: area.x + area.width.saturating_sub(width) / 2,
            y: area.y,
            width,
            height: area.height.min(KEYPAD_HEIGHT),
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(BUTTON_HEIGHT); KEYPAD_ROWS as usize])
            .split(keypad);

        let mut buttons = [Rect::default(); Action::ALL.len()];
        for (index, button) in buttons.iter_mut().enumerate() {
            let row = index / KEYPAD_COLUMNS as usize;
            let col = index % KEYPAD_COLUMNS as usize;
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, u32::from(KEYPAD_COLUMNS)); KEYPAD_COLUMNS as usize])
                .split(rows[row]);
            *button = cols[col];
        }

        Self { buttons }
    }

    /// All eight buttons on one line, for the inline viewport.
    #[must_use]
    pub fn single_row(area: Rect) -> Self {
        let row = Rect {
            height: area.height.min(1),
            width: area.width.min(ROW_BUTTON_WIDTH * Action::ALL.len() as u16),
            ..area
        };
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(ROW_BUTTON_WIDTH); Action::ALL.len()])
            .split(row);

        let mut buttons = [Rect::default(); Action::ALL.len()];
        for (button, col) in buttons.iter_mut().zip(cols.iter()) {
            *button = *col;
        }
        Self { buttons }
    }

    /// Rectangle for `action`'s button.
    #[must_use]
    pub fn button(&self, action: Action) -> Rect {
        self.buttons[action.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Action, Rect)> + '_ {
        Action::ALL.iter().copied().zip(self.buttons.iter().copied())
    }

    /// The action whose button contains the cell at (`column`, `row`).
    #[must_use]
    pub fn hit(&self, column: u16, row: u16) -> Option<Action> {
        self.iter()
            .find(|(_, rect)| !rect.is_empty() && rect.contains((column, row).into()))
            .map(|(action, _)| action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(v: u8) -> Action {
        Action::new(v).unwrap()
    }

    #[test]
    fn buttons_fill_three_columns() {
        let layout = KeypadLayout::compute(Rect::new(0, 0, 30, KEYPAD_HEIGHT));

        assert_eq!(layout.button(action(1)), Rect::new(0, 0, 10, 3));
        assert_eq!(layout.button(action(3)), Rect::new(20, 0, 10, 3));
        assert_eq!(layout.button(action(4)), Rect::new(0, 3, 10, 3));
        assert_eq!(layout.button(action(8)), Rect::new(10, 6, 10, 3));
    }

    #[test]
    fn hit_maps_cells_to_actions() {
        let layout = KeypadLayout::compute(Rect::new(0, 5, 30, KEYPAD_HEIGHT));

        assert_eq!(layout.hit(0, 5), Some(action(1)));
        assert_eq!(layout.hit(15, 7), Some(action(2)));
        assert_eq!(layout.hit(29, 10), Some(action(6)));
        assert_eq!(layout.hit(12, 13), Some(action(8)));
        // Ninth slot is empty.
        assert_eq!(layout.hit(25, 12), None);
        // Above the keypad.
        assert_eq!(layout.hit(5, 4), None);
    }

    #[test]
    fn wide_areas_center_the_keypad() {
        let layout = KeypadLayout::compute(Rect::new(0, 0, 100, 20));
        let first = layout.button(action(1));
        assert_eq!(first.x, (100 - KEYPAD_MAX_WIDTH) / 2);
        assert_eq!(first.width, KEYPAD_MAX_WIDTH / 3);
    }

    #[test]
    fn single_row_places_buttons_left_to_right() {
        let layout = KeypadLayout::single_row(Rect::new(2, 10, 80, 1));

        assert_eq!(layout.button(action(1)), Rect::new(2, 10, 5, 1));
        assert_eq!(layout.button(action(8)), Rect::new(37, 10, 5, 1));
        assert_eq!(layout.hit(8, 10), Some(action(2)));
        assert_eq!(layout.hit(8, 11), None);
    }

    #[test]
    fn default_layout_hits_nothing() {
        assert_eq!(KeypadLayout::default().hit(0, 0), None);
    }
}
