use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, ViewMode};
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let style = theme::current().status;
        let w = area.width as usize;

        let mode_str = match app.view_mode {
            ViewMode::Calendar => "[1]Calendar".to_string(),
            ViewMode::Events => format!("[2]Events <{}>", app.filter.label()),
        };
        let focus = if app.form_state.is_some() { " [Form]" } else { "" };
        let left = format!(" {}{} ", mode_str, focus);

        // Status message wins over hints
        let right = match app.status_message {
            Some(ref msg) => format!(" {} ", msg),
            None => hints(app.view_mode, w).to_string(),
        };

        let padding = " ".repeat(w.saturating_sub(left.chars().count() + right.chars().count()));

        let line = Line::from(vec![
            Span::styled(left, style),
            Span::styled(padding, style),
            Span::styled(right, style),
        ]);
        frame.render_widget(Paragraph::new(line).style(style), area);
    }
}

fn hints(view: ViewMode, w: usize) -> &'static str {
    match view {
        ViewMode::Calendar if w >= 80 => {
            " hjkl:Nav [/]:Month t:Today Enter:Add 2:Events ?:Help q:Quit "
        }
        ViewMode::Calendar if w >= 50 => " hjkl:Nav [/]:Mon n:New q:Quit ",
        ViewMode::Events if w >= 80 => {
            " jk:Select e:Edit d:Del f:Filter n:New 1:Calendar ?:Help q:Quit "
        }
        ViewMode::Events if w >= 50 => " jk:Sel e:Edit d:Del f:Filter q:Quit ",
        _ => " ?:Help q:Quit ",
    }
}
