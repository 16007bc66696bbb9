use polars::prelude::*;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Widget},
};
use std::borrow::Cow;

/// Pages jumped by PageUp/PageDown.
pub const PAGE_JUMP: usize = 10;

/// Read-only pagination over the listings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TablePager {
    pub page: usize,
    pub page_size: usize,
    /// First visible column.
    pub column_offset: usize,
}

impl TablePager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
            column_offset: 0,
        }
    }

    /// Pages needed for `rows`; an empty table still has one page.
    pub fn page_count(&self, rows: usize) -> usize {
        rows.div_ceil(self.page_size).max(1)
    }

    pub fn next_page(&mut self, rows: usize) {
        self.page = (self.page + 1).min(self.page_count(rows) - 1);
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn jump_forward(&mut self, rows: usize) {
        self.page = (self.page + PAGE_JUMP).min(self.page_count(rows) - 1);
    }

    pub fn jump_back(&mut self) {
        self.page = self.page.saturating_sub(PAGE_JUMP);
    }

    pub fn first_page(&mut self) {
        self.page = 0;
    }

    pub fn last_page(&mut self, rows: usize) {
        self.page = self.page_count(rows) - 1;
    }

    pub fn scroll_right(&mut self, columns: usize) {
        self.column_offset = (self.column_offset + 1).min(columns.saturating_sub(1));
    }

    pub fn scroll_left(&mut self) {
        self.column_offset = self.column_offset.saturating_sub(1);
    }

    /// Row index of the first row on the current page.
    pub fn first_row(&self) -> usize {
        self.page * self.page_size
    }

    pub fn position_label(&self, rows: usize) -> String {
        format!("Page {} of {}", self.page + 1, self.page_count(rows))
    }
}

/// Renders one page of rows, starting at `column_offset`, as wide as each
/// column's content and header need.
pub struct DataTable<'a> {
    page: &'a DataFrame,
    column_offset: usize,
    title: String,
    focused: bool,
    header_fg: Color,
    border_color: Color,
    active_color: Color,
    cell_padding: u16,
}

impl<'a> DataTable<'a> {
    pub fn new(page: &'a DataFrame, column_offset: usize) -> Self {
        Self {
            page,
            column_offset,
            title: String::new(),
            focused: false,
            header_fg: Color::White,
            border_color: Color::Cyan,
            active_color: Color::Yellow,
            cell_padding: 2,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn with_colors(mut self, header_fg: Color, border: Color, active: Color) -> Self {
        self.header_fg = header_fg;
        self.border_color = border;
        self.active_color = active;
        self
    }

    fn render_rows(&self, area: Rect, buf: &mut Buffer) {
        let df = self.page;
        let (height, cols) = df.shape();
        if cols == 0 {
            Paragraph::new("No columns").render(area, buf);
            return;
        }
        let visible_rows = height.min(area.height.saturating_sub(1) as usize);

        let mut widths: Vec<u16> = Vec::new();
        let mut headers: Vec<Span> = Vec::new();
        let mut rows: Vec<Vec<Cell>> = vec![vec![]; visible_rows];
        let mut used_width: u16 = 0;

        for column in df.get_columns().iter().skip(self.column_offset) {
            let mut max_len = column.name().chars().count() as u16;
            let mut cells = Vec::with_capacity(visible_rows);
            for row_index in 0..visible_rows {
                let text: Cow<str> = match column.get(row_index) {
                    Ok(AnyValue::Null) | Err(_) => Cow::Borrowed(""),
                    Ok(value) => value.str_value(),
                };
                max_len = max_len.max(text.chars().count() as u16);
                cells.push(Cell::from(Line::from(text.into_owned())));
            }

            // Long text columns are cut to the remaining width instead of hidden
            let remaining = area.width.saturating_sub(used_width);
            let width = if used_width + max_len <= area.width {
                max_len
            } else if remaining > 0 && (widths.is_empty() || column.dtype() == &DataType::String) {
                remaining
            } else {
                break;
            };

            widths.push(width);
            headers.push(Span::raw(column.name().to_string()));
            for (row, cell) in rows.iter_mut().zip(cells) {
                row.push(cell);
            }
            used_width = used_width.saturating_add(width + self.cell_padding);
            if used_width >= area.width {
                break;
            }
        }

        let rows: Vec<Row> = rows.into_iter().map(Row::new).collect();
        let header_style = Style::default()
            .fg(self.header_fg)
            .add_modifier(Modifier::BOLD);
        let constraints: Vec<Constraint> = widths.iter().map(|w| Constraint::Length(*w)).collect();

        Widget::render(
            Table::new(rows, constraints)
                .column_spacing(self.cell_padding)
                .header(Row::new(headers).style(header_style)),
            area,
            buf,
        );
    }
}

impl Widget for DataTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = Style::default().fg(if self.focused {
            self.active_color
        } else {
            self.border_color
        });
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(self.title.as_str())
            .border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);
        self.render_rows(inner, buf);
    }
}
