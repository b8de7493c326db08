use super::{
    state::{State, Status},
    utility::{Center, WrappedString},
    Frame, Terminal,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Clear},
};

/// Dialogs never get narrower than this, unless the terminal is.
const MIN_WIDTH: u16 = 40;

/// Displays a question and returns whether the user confirmed.
pub fn confirm<S>(term: &mut Terminal, bg: Option<&dyn State>, msg: S) -> Result<bool>
where
    S: Into<String>,
{
    let value = dialog(term, bg, DialogContent::Confirm(msg.into()))?.is_some();
    Ok(value)
}

/// Displays an info dialog until a key is pressed.
pub fn info<S>(term: &mut Terminal, bg: Option<&dyn State>, msg: S) -> Result<()>
where
    S: Into<String>,
{
    notice(term, bg, NoticeLevel::Info, msg)
}

/// Displays an error dialog until a key is pressed.
pub fn error<S>(term: &mut Terminal, bg: Option<&dyn State>, msg: S) -> Result<()>
where
    S: Into<String>,
{
    notice(term, bg, NoticeLevel::Error, msg)
}

/// Displays a fatal error dialog until a key is pressed.
pub fn fatal<S>(term: &mut Terminal, msg: S) -> Result<()>
where
    S: Into<String>,
{
    notice(term, None, NoticeLevel::Fatal, msg)
}

/// Displays a dialog with a message of a certain priority level specified by [`NoticeLevel`].
fn notice<S>(term: &mut Terminal, bg: Option<&dyn State>, level: NoticeLevel, msg: S) -> Result<()>
where
    S: Into<String>,
{
    dialog(term, bg, DialogContent::Notice(level, msg.into())).map(|_| ())
}

/// Displays a dialog with specified contents. Depending on how the user exits the dialog, the
/// content is returned for inspection.
fn dialog(term: &mut Terminal, bg: Option<&dyn State>, content: DialogContent) -> Result<Option<DialogContent>> {
    let state = super::state::exec(term, Dialog { content, bg })?;
    Ok(state.map(|d| d.content))
}

/// Defines the different levels of notices a dialog can display.
enum NoticeLevel {
    Info,
    Error,
    Fatal,
}

/// Defines what may be contained within a dialog.
enum DialogContent {
    Confirm(String),
    Notice(NoticeLevel, String),
}

struct Dialog<'a> {
    /// Contains the content of the dialog.
    content: DialogContent,
    /// Drawn before the dialog, such that the dialog lays on top.
    bg: Option<&'a dyn State>,
}

impl<'a> State for Dialog<'a> {
    fn update(&mut self, _: &mut Terminal, key: KeyCode, _: KeyModifiers) -> Result<Status> {
        let status = match &self.content {
            DialogContent::Confirm(..) => match key {
                KeyCode::Char('y') |
                KeyCode::Char('Y') => Status::Done,
                KeyCode::Esc       |
                KeyCode::Char('n') |
                KeyCode::Char('N') => Status::Cancelled,
                _ => Status::Running,
            },
            DialogContent::Notice(..) => Status::Done,
        };
        Ok(status)
    }

    fn draw(&self, frame: &mut Frame) {
        if let Some(bg) = &self.bg {
            bg.draw(frame);
        }

        let (title, style, hint) = match &self.content {
            DialogContent::Notice(level, _) => {
                let (title, color) = match level {
                    NoticeLevel::Info    => ("Info",        Color::Cyan),
                    NoticeLevel::Error   => ("Error",       Color::Red),
                    NoticeLevel::Fatal   => ("Fatal Error", Color::Red),
                };
                (
                    title,
                    Style::default().fg(color),
                    "Press any key to close...",
                )
            }
            DialogContent::Confirm(_) => (
                "Confirm",
                Style::default().fg(Color::Yellow),
                "Press (y) to confirm, (n) or (esc) to cancel...",
            ),
        };

        let msg = match &self.content {
            DialogContent::Confirm(msg) | DialogContent::Notice(_, msg) => msg.as_str(),
        };

        // size the dialog after its wrapped contents, leaving room for borders and margins
        let area = frame.size();
        let width = ((area.width as f32 * 0.6) as u16).max(MIN_WIDTH.min(area.width));
        let text_width = width.saturating_sub(8).max(1);
        let msg_widget = WrappedString::new(msg, text_width);
        let hint_widget = WrappedString::new(hint, text_width)
            .style(Style::default().add_modifier(Modifier::ITALIC));
        let height = (msg_widget.height() + hint_widget.height() + 5).min(area.height);
        let dialog_area = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .style(style)
            .title(format!(" {} ", title.to_uppercase()))
            .border_type(BorderType::Thick);
        let client_area = block.inner(dialog_area);
        frame.render_widget(Clear, dialog_area);
        frame.render_widget(block, dialog_area);

        let layout = Layout::default()
            .horizontal_margin(3)
            .vertical_margin(1)
            .constraints([Constraint::Min(1), Constraint::Length(hint_widget.height())])
            .split(client_area);
        frame.render_widget(msg_widget.center(), layout[0]);
        frame.render_widget(hint_widget, layout[1]);
    }
}
