//! Scrollable list of options for the checklist, dropdown and column picker.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, StatefulWidget},
};

use crate::options::OptionSet;

/// What is currently chosen in the list.
#[derive(Debug, Clone, Copy)]
pub enum Chosen<'a> {
    /// Single choice (dropdown, column picker).
    One(Option<&'a str>),
    /// Any number of choices (checklist).
    Many(&'a [String]),
}

impl Chosen<'_> {
    fn contains(&self, value: &str) -> bool {
        match self {
            Chosen::One(current) => *current == Some(value),
            Chosen::Many(values) => values.iter().any(|v| v == value),
        }
    }

    fn marker(&self, chosen: bool) -> &'static str {
        match (self, chosen) {
            (Chosen::One(_), true) => "●",
            (Chosen::One(_), false) => "○",
            (Chosen::Many(_), true) => "☑",
            (Chosen::Many(_), false) => "☐",
        }
    }
}

pub struct OptionList<'a> {
    title: &'a str,
    options: &'a OptionSet,
    chosen: Chosen<'a>,
    focused: bool,
    border_color: Color,
    active_color: Color,
    disabled_color: Color,
}

impl<'a> OptionList<'a> {
    pub fn new(title: &'a str, options: &'a OptionSet, chosen: Chosen<'a>) -> Self {
        Self {
            title,
            options,
            chosen,
            focused: false,
            border_color: Color::DarkGray,
            active_color: Color::Yellow,
            disabled_color: Color::DarkGray,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn colors(mut self, border: Color, active: Color, disabled: Color) -> Self {
        self.border_color = border;
        self.active_color = active;
        self.disabled_color = disabled;
        self
    }
}

impl StatefulWidget for OptionList<'_> {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut ListState) {
        let border_style = Style::default().fg(if self.focused {
            self.active_color
        } else {
            self.border_color
        });
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(self.title)
            .border_style(border_style);

        let items: Vec<ListItem> = self
            .options
            .items()
            .iter()
            .map(|item| {
                let chosen = self.chosen.contains(&item.value);
                let marker = self.chosen.marker(chosen);
                let line = if item.disabled {
                    Line::from(vec![
                        Span::raw(format!("{} {}", marker, item.label)),
                        Span::raw(" (unavailable)"),
                    ])
                    .style(Style::default().fg(self.disabled_color))
                } else if chosen {
                    Line::from(format!("{} {}", marker, item.label))
                        .style(Style::default().fg(self.active_color))
                } else {
                    Line::from(format!("{} {}", marker, item.label))
                };
                ListItem::new(line)
            })
            .collect();

        let highlight = if self.focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        let list = List::new(items).block(block).highlight_style(highlight);
        StatefulWidget::render(list, area, buf, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionItem;

    fn options() -> OptionSet {
        let item = |label: &str, disabled| OptionItem {
            label: label.to_string(),
            value: label.to_string(),
            disabled,
        };
        OptionSet::new(vec![item("Histogram", false), item("Heat map", true)])
    }

    fn text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.y..area.bottom())
            .flat_map(|y| (area.x..area.right()).map(move |x| (x, y)))
            .map(|pos| buf[pos].symbol().to_string())
            .collect()
    }

    #[test]
    fn checklist_marks_members() {
        let options = options();
        let chosen = vec!["Heat map".to_string()];
        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);
        let mut state = ListState::default();
        OptionList::new("Compare", &options, Chosen::Many(&chosen)).render(area, &mut buf, &mut state);
        let text = text(&buf);
        assert!(text.contains("☐ Histogram"), "{}", text);
        assert!(text.contains("☑ Heat map (unavailable)"), "{}", text);
    }

    #[test]
    fn single_choice_marks_value() {
        let options = options();
        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);
        let mut state = ListState::default();
        OptionList::new("Type", &options, Chosen::One(Some("Histogram")))
            .focused(true)
            .render(area, &mut buf, &mut state);
        assert!(text(&buf).contains("● Histogram"));
    }
}
