use std::time::Duration;

use chrono::Local;
use color_eyre::Result;
use ratatui::layout::{Constraint, Layout, Rect};
use tracing::info;

use event_calendar::app::{App, ViewMode};
use event_calendar::calendar::{FileSlot, MemorySlot, Store};
use event_calendar::config::Config;
use event_calendar::{components, event, logging, theme, tui};

fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::load()?;
    if let Err(err) = logging::init(&config.log_file, &config.log_filter) {
        eprintln!("Logging disabled: {err}");
    }
    theme::init(&config.theme);

    let ephemeral = std::env::args().skip(1).any(|arg| arg == "--ephemeral");
    let store = if ephemeral {
        info!("starting without a data file");
        Store::open(MemorySlot::new())
    } else {
        let slot = FileSlot::new(&config.data_file);
        info!(data_file = %slot.path().display(), "starting");
        Store::open(slot)
    };
    let mut app = App::new(store, Local::now().date_naive());

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        app.today = Local::now().date_naive();

        terminal.draw(|frame| {
            let area = frame.area();

            // Main layout: content + status bar
            let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

            match app.view_mode {
                ViewMode::Calendar => {
                    let grid = app.grid();
                    components::MonthView::render(
                        frame,
                        layout[0],
                        &grid,
                        app.selected_date,
                        app.today,
                    );
                }
                ViewMode::Events => {
                    components::EventList::render(
                        frame,
                        layout[0],
                        &app.visible_events(),
                        app.filter,
                        app.list_index,
                    );
                }
            }

            if let Some(ref form) = app.form_state {
                components::EventForm::render(frame, area, form);
            }

            if app.show_help {
                render_help(frame, area);
            }

            components::StatusBar::render(frame, layout[1], app);
        })?;

        if let Some(key) = event::next_key_event(Duration::from_millis(250))? {
            if let Some(action) = event::action_for(app.key_context(), key) {
                app.apply(action);
            }
        }
    }

    info!("quitting");
    Ok(())
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let popup_w = area.width.clamp(30, 52).min(area.width);
    let popup_h = area.height.clamp(12, 23).min(area.height);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let binding = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", keys), key_style),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Calendar", section_style)),
        binding("h/l", "Previous/next day"),
        binding("j/k", "Next/previous week"),
        binding("[/]", "Previous/next month"),
        binding("t", "Jump to today"),
        binding("Enter/n", "Add event on selected day"),
        Line::from(""),
        Line::from(Span::styled("Events", section_style)),
        binding("j/k", "Select event"),
        binding("e/Enter", "Edit selected event"),
        binding("d", "Delete selected event"),
        binding("f", "Filter: All / Work / Personal"),
        Line::from(""),
        Line::from(Span::styled("General", section_style)),
        binding("1/2", "Calendar / Events view"),
        binding("?", "Toggle this help"),
        binding("q", "Quit"),
    ];

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
