use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Paragraph, Widget},
};

#[derive(Default)]
pub struct DebugState {
    pub num_events: usize,
    pub num_frames: usize,
    pub num_key_events: usize,
    pub num_recomputes: usize,
    pub last_key_event_name: String,
    /// Last control change applied, e.g. "chart-kind".
    pub last_change: String,
    pub enabled: bool,
}

impl DebugState {
    pub fn on_key(&mut self, event: &crossterm::event::KeyEvent) {
        self.num_key_events += 1;
        self.last_key_event_name = format!("{:?}", event.code);
    }

    pub fn on_recompute(&mut self, control: &str, cleared: usize) {
        self.num_recomputes += 1;
        self.last_change = if cleared > 0 {
            format!("{} (cleared {})", control, cleared)
        } else {
            control.to_string()
        };
    }
}

impl Widget for &DebugState {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(format!(
            "events={} keys={} last_key={} recomputes={} last_change={} frames={}",
            self.num_events,
            self.num_key_events,
            self.last_key_event_name,
            self.num_recomputes,
            self.last_change,
            self.num_frames,
        ))
        .render(area, buf);
    }
}
