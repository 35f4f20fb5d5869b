use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::calendar::{CategoryFilter, Event};
use crate::components::month_view::truncate;
use crate::theme;

pub struct EventList;

impl EventList {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        events: &[&Event],
        filter: CategoryFilter,
        selected_index: usize,
    ) {
        let theme = theme::current();
        let w = area.width as usize;

        let title = if w >= 30 {
            format!(" Events: {} ({}) ", filter.label(), events.len())
        } else {
            " Events ".to_string()
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        if events.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = match filter {
                CategoryFilter::All => "No events. Press n to add one".to_string(),
                CategoryFilter::Only(category) => format!("No {} events", category),
            };
            frame.render_widget(Paragraph::new(msg).style(theme.dim), inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = events
            .iter()
            .map(|event| format_event(event, inner_w))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(theme.selected.add_modifier(Modifier::BOLD));
        let mut state = ListState::default().with_selected(Some(selected_index.min(events.len() - 1)));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn format_event(event: &Event, max_width: usize) -> ListItem<'static> {
    let theme = theme::current();
    let category_style = theme.category(event.category);

    let date_str = format!(" {} ", event.date.format("%a %b %d, %Y"));
    let category_str = format!("{:<9}", event.category.as_str());
    let fixed = 2 + date_str.chars().count() + category_str.len();
    let title = truncate(&event.title, max_width.saturating_sub(fixed));

    ListItem::new(Line::from(vec![
        Span::styled("\u{258c} ", category_style),
        Span::styled(category_str, category_style),
        Span::styled(date_str, theme.dim),
        Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
    ]))
}
