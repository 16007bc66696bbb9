//! Bordered block of radio options laid out in a grid (● selected, ○ unselected).
//! Used for the selection mode and chart kind controls.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::options::OptionSet;

/// Radio options with an optional selection. `cursor` is the option the
/// keyboard points at while the block is focused.
pub struct RadioBlock<'a> {
    title: &'a str,
    options: &'a OptionSet,
    selected: Option<usize>,
    cursor: Option<usize>,
    focused: bool,
    columns: usize,
    border_color: Color,
    active_color: Color,
    disabled_color: Color,
}

impl<'a> RadioBlock<'a> {
    pub fn new(title: &'a str, options: &'a OptionSet) -> Self {
        Self {
            title,
            options,
            selected: None,
            cursor: None,
            focused: false,
            columns: options.len().max(1),
            border_color: Color::DarkGray,
            active_color: Color::Yellow,
            disabled_color: Color::DarkGray,
        }
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    pub fn focused(mut self, focused: bool, cursor: usize) -> Self {
        self.focused = focused;
        self.cursor = focused.then_some(cursor);
        self
    }

    /// Options per row; rows wrap when there are more.
    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }

    pub fn colors(mut self, border: Color, active: Color, disabled: Color) -> Self {
        self.border_color = border;
        self.active_color = active;
        self.disabled_color = disabled;
        self
    }

    fn render_inner(&self, area: Rect, buf: &mut Buffer) {
        let n = self.options.len();
        if n == 0 || area.width == 0 || area.height == 0 {
            return;
        }
        let cols = self.columns.min(n);
        let col_width = area.width / cols as u16;

        for (idx, item) in self.options.items().iter().enumerate() {
            let row = (idx / cols) as u16;
            let col = (idx % cols) as u16;
            if row >= area.height {
                break;
            }
            let cell = Rect {
                x: area.x + col * col_width,
                y: area.y + row,
                width: col_width,
                height: 1,
            };

            let is_selected = Some(idx) == self.selected;
            let marker = if is_selected { "●" } else { "○" };
            let mut style = if item.disabled {
                Style::default().fg(self.disabled_color)
            } else if is_selected {
                Style::default().fg(self.active_color)
            } else {
                Style::default().fg(self.border_color)
            };
            if Some(idx) == self.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let text = format!("{} {}", marker, item.label);
            Paragraph::new(Line::from(Span::styled(text, style))).render(cell, buf);
        }
    }
}

impl Widget for RadioBlock<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block_style = if self.focused {
            Style::default().fg(self.active_color)
        } else {
            Style::default().fg(self.border_color)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(self.title)
            .border_style(block_style);
        let inner = block.inner(area);
        block.render(area, buf);
        self.render_inner(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionItem;

    fn options() -> OptionSet {
        OptionSet::new(
            ["None", "Histogram", "Line Chart", "Pie Chart"]
                .iter()
                .map(|label| OptionItem {
                    label: label.to_string(),
                    value: label.to_lowercase(),
                    disabled: false,
                })
                .collect(),
        )
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn marks_selected_option() {
        let options = options();
        let area = Rect::new(0, 0, 60, 3);
        let mut buf = Buffer::empty(area);
        RadioBlock::new("Chart", &options)
            .selected(Some(1))
            .render(area, &mut buf);
        let line = row_text(&buf, 1);
        assert!(line.contains("○ None"), "{}", line);
        assert!(line.contains("● Histogram"), "{}", line);
    }

    #[test]
    fn wraps_into_rows() {
        let options = options();
        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);
        RadioBlock::new("Chart", &options)
            .columns(2)
            .render(area, &mut buf);
        assert!(row_text(&buf, 2).contains("Pie Chart"));
    }
}
