use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Paragraph, Widget},
};

const CONTROLS: [(&str, &str); 6] = [
    ("Tab", "Focus"),
    ("Space", "Select"),
    ("e", "PNG"),
    ("E", "SVG"),
    ("J", "JSON"),
    ("q", "Quit"),
];

/// Key hints, page position, row count and the latest notice.
#[derive(Default)]
pub struct Controls {
    pub row_count: Option<usize>,
    pub page_label: Option<String>,
    pub notice: Option<String>,
    pub dimmed: bool,
    pub bg: Option<Color>,
    pub notice_fg: Option<Color>,
    pub text_fg: Option<Color>,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row_count(mut self, row_count: usize) -> Self {
        self.row_count = Some(row_count);
        self
    }

    pub fn with_page_label(mut self, label: String) -> Self {
        self.page_label = Some(label);
        self
    }

    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }

    pub fn with_dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }

    pub fn with_bg(mut self, bg: Color) -> Self {
        self.bg = Some(bg);
        self
    }

    /// Foregrounds for the notice and the page/row status.
    pub fn with_colors(mut self, notice: Color, text: Color) -> Self {
        self.notice_fg = Some(notice);
        self.text_fg = Some(text);
        self
    }
}

impl Widget for &Controls {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut constraints = CONTROLS.iter().fold(vec![], |mut acc, (key, action)| {
            acc.push(Constraint::Length(key.chars().count() as u16 + 2));
            acc.push(Constraint::Length(action.chars().count() as u16 + 1));
            acc
        });
        constraints.push(Constraint::Fill(1));
        let status_width = self
            .page_label
            .iter()
            .map(|l| l.chars().count() as u16 + 3)
            .sum::<u16>()
            + if self.row_count.is_some() { 15 } else { 0 };
        constraints.push(Constraint::Length(status_width));

        let layout = Layout::new(Direction::Horizontal, constraints).split(area);
        let bg = self.bg.unwrap_or(Color::DarkGray);
        let base_style = if self.dimmed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        for (i, (key, action)) in CONTROLS.iter().enumerate() {
            let j = i * 2;
            Paragraph::new(*key)
                .style(base_style.bold())
                .centered()
                .render(layout[j], buf);
            Paragraph::new(*action)
                .style(base_style.bg(bg))
                .render(layout[j + 1], buf);
        }

        let notice_idx = CONTROLS.len() * 2;
        let notice = self.notice.as_deref().unwrap_or("");
        Paragraph::new(format!(" {}", notice))
            .style(base_style.bg(bg).fg(self.notice_fg.unwrap_or(Color::Yellow)))
            .render(layout[notice_idx], buf);

        let mut status = Vec::new();
        if let Some(label) = &self.page_label {
            status.push(label.clone());
        }
        if let Some(count) = self.row_count {
            status.push(format!("Rows: {}", count));
        }
        Paragraph::new(status.join(" | "))
            .style(base_style.bg(bg).fg(if self.dimmed {
                Color::DarkGray
            } else {
                self.text_fg.unwrap_or(Color::White)
            }))
            .right_aligned()
            .render(layout[notice_idx + 1], buf);
    }
}
