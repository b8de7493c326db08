use std::borrow::Cow;
use tui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::Widget,
};

/// Widget wrapper for centering vertically according to specified height.
pub struct CenteredWidget<W: Widget> {
    widget: W,
    height: u16,
}

impl<W: Widget> CenteredWidget<W> {
    pub fn new(widget: W, height: u16) -> Self {
        CenteredWidget { widget, height }
    }
}

impl<W: Widget> Widget for CenteredWidget<W> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let offset = area
            .height
            .checked_sub(self.height)
            .map(|d| d / 2)
            .unwrap_or(0);
        let centered = Layout::default()
            .constraints([Constraint::Length(offset), Constraint::Length(self.height)])
            .split(area)[1];
        self.widget.render(centered, buf);
    }
}

pub trait Center {
    type W: Widget;
    fn center(self) -> CenteredWidget<Self::W>;
}

/// Utility widget to wrap a string at a certain width. Defined since the wrap functionality in
/// [`Paragraph`](tui::widgets::Paragraph) doesn't allow inspecting the number of produced lines (the "height") for dynamic
/// layouts.
pub struct WrappedString<'a> {
    lines: Vec<Cow<'a, str>>,
    style: Style,
}

impl<'a> WrappedString<'a> {
    pub fn new(string: &'a str, width: u16) -> Self {
        WrappedString {
            lines: textwrap::wrap(string, width.max(1) as usize),
            style: Style::default(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn height(&self) -> u16 {
        self.lines.len() as u16
    }
}

impl<'a> Widget for WrappedString<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (i, line) in self.lines.iter().enumerate().take(area.height as usize) {
            buf.set_stringn(
                area.x,
                area.y + i as u16,
                line,
                area.width as usize,
                self.style,
            );
        }
    }
}

impl Center for WrappedString<'_> {
    type W = Self;

    fn center(self) -> CenteredWidget<Self> {
        let height = self.height();
        CenteredWidget::new(self, height)
    }
}

/// Formats a byte count with a binary unit, e.g. `1.5 MiB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes() {
        let data = [
            (0, "0 B"),
            (1023, "1023 B"),
            (1024, "1.0 KiB"),
            (1536, "1.5 KiB"),
            (25 * 1024 * 1024, "25.0 MiB"),
            (3 * 1024 * 1024 * 1024, "3.0 GiB"),
        ];

        for (bytes, expected) in data {
            assert_eq!(format_bytes(bytes), expected);
        }
    }

    #[test]
    fn wrapped_height() {
        let wrapped = WrappedString::new("pip install numpy", 7);
        assert_eq!(wrapped.height(), 3);
        assert_eq!(WrappedString::new("a\nb\nc", 40).height(), 3);
    }
}
