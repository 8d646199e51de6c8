use crate::app::App;
use arcana_core::{SlotPhase, SpreadCard};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Modifier, Span, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(9),
            Constraint::Length(8),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);
    draw_spread(frame, root[1], app);
    draw_slots(frame, root[2], app);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(root[3]);
    draw_flights(frame, bottom[0], app);
    draw_events(frame, bottom[1], app);

    if app.show_help {
        draw_help_popup(frame);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let (count, max) = app
        .session
        .selection()
        .map(|selection| (selection.selected_count(), selection.max_selection()))
        .unwrap_or((0, app.session.config().max_selection));
    let cursor = match app.cursor_card() {
        Some(item) => format!(
            "#{:>2}  {:+6.1}°  lift {:5.1}",
            item.arc_index, item.angle, item.vertical_offset
        ),
        None => "-".to_string(),
    };
    let lines = vec![
        Line::from(format!(
            "Arcana | deck: {} | picked {count}/{max} | cursor {cursor}",
            app.deck_label
        ))
        .bold(),
        Line::from(format!("Status: {}", app.status_line)),
    ];
    let block = Block::default().borders(Borders::ALL).title("Overview");
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(paragraph, area);
}

/// Renders the fan as a character grid: column by arc index, row by lift, so
/// the outer cards climb towards the top edge.
fn draw_spread(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title("Spread");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let spread = app.spread();
    if spread.is_empty() || inner.width == 0 || inner.height == 0 {
        return;
    }

    let grid = spread_grid(spread, app.cursor, inner.width as usize, inner.height as usize);
    let lines: Vec<Line<'static>> = grid.into_iter().map(Line::from).collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Cards sharing a cell overwrite each other; the cursor card goes last so
/// it always stays visible.
fn spread_grid(
    spread: &[SpreadCard],
    cursor: usize,
    width: usize,
    height: usize,
) -> Vec<Vec<Span<'static>>> {
    let max_lift = spread
        .iter()
        .map(|item| item.vertical_offset)
        .fold(0.0_f64, f64::max);
    let mut grid: Vec<Vec<Span<'static>>> = vec![vec![Span::raw(" "); width]; height];
    for item in spread.iter().filter(|item| item.arc_index != cursor) {
        let (col, row) = grid_cell(item, spread.len(), width, height, max_lift);
        grid[row][col] = card_glyph(item, false);
    }
    if let Some(item) = spread.iter().find(|item| item.arc_index == cursor) {
        let (col, row) = grid_cell(item, spread.len(), width, height, max_lift);
        grid[row][col] = card_glyph(item, true);
    }
    grid
}

fn grid_cell(
    item: &SpreadCard,
    count: usize,
    width: usize,
    height: usize,
    max_lift: f64,
) -> (usize, usize) {
    if !item.placed {
        return (0, height - 1);
    }
    let col = if count > 1 {
        item.arc_index * (width - 1) / (count - 1)
    } else {
        width / 2
    };
    let lift = if max_lift > 0.0 {
        item.vertical_offset / max_lift
    } else {
        0.0
    };
    let row = (height - 1) - (lift * (height - 1) as f64).round() as usize;
    (col.min(width - 1), row.min(height - 1))
}

fn card_glyph(item: &SpreadCard, under_cursor: bool) -> Span<'static> {
    let (symbol, style) = if item.is_selected() {
        ("·", Style::default().fg(Color::DarkGray))
    } else {
        ("▮", Style::default().fg(Color::Magenta))
    };
    if under_cursor {
        Span::styled(
            if item.is_selected() { "◦" } else { "▲" },
            style.fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(symbol, style)
    }
}

fn draw_slots(frame: &mut Frame, area: Rect, app: &App) {
    let Some(selection) = app.session.selection() else {
        let block = Block::default().borders(Borders::ALL).title("Slots");
        frame.render_widget(Paragraph::new("no draw").block(block), area);
        return;
    };
    let slots = selection.slots().slots();
    if slots.is_empty() {
        return;
    }
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, slots.len() as u32); slots.len()])
        .split(area);
    let now = app.now_ms();
    for (slot, column) in slots.iter().zip(columns.iter()) {
        // raised slots use the full column; the others start one row lower
        let drop = if slot.raise > 0.0 { 0 } else { 1 };
        let cell = Rect {
            y: column.y + drop,
            height: column.height.saturating_sub(drop),
            ..*column
        };
        let seated = app.session.sequencer().seated(slot.index);
        let (body, style) = match (slot.phase, seated, slot.occupant.as_ref()) {
            (SlotPhase::Empty, _, _) => ("empty".to_string(), Style::default().fg(Color::DarkGray)),
            (SlotPhase::Flying, _, _) => ("incoming…".to_string(), Style::default().fg(Color::Cyan)),
            (_, Some(visual), Some(card)) => {
                let text = if visual.face_up {
                    card.name.clone()
                } else {
                    "░░░░".to_string()
                };
                let style = if visual.opacity_at(now) < 1.0 {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                };
                (text, style)
            }
            _ => ("?".to_string(), Style::default()),
        };
        let title = format!("{} [{}]", slot.label(), slot.index + 1);
        let block = Block::default().borders(Borders::ALL).title(title);
        let paragraph = Paragraph::new(Line::from(body).style(style))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(paragraph, cell);
    }
}

fn draw_flights(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title("In flight");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let now = app.now_ms();
    let flights: Vec<_> = app.session.sequencer().in_flight().copied().collect();
    if flights.is_empty() {
        frame.render_widget(Paragraph::new("-").fg(Color::DarkGray), inner);
        return;
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); flights.len()])
        .split(inner);
    for (visual, row) in flights.iter().zip(rows.iter()) {
        let progress = match visual.travel_started_ms {
            Some(start) if visual.travel_ms > 0 => {
                (now.saturating_sub(start) as f64 / visual.travel_ms as f64).clamp(0.0, 1.0)
            }
            Some(_) => 1.0,
            None => 0.0,
        };
        let at = visual.placement_at(now);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(progress)
            .label(format!(
                "-> slot {}  rot {:+.0}°  x{:.2}",
                visual.slot + 1,
                at.rotation_deg,
                at.scale
            ));
        frame.render_widget(gauge, *row);
    }
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem<'_>> = app
        .event_log
        .iter()
        .rev()
        .take(visible)
        .rev()
        .map(|line| ListItem::new(line.as_str()))
        .collect();
    let block = Block::default().borders(Borders::ALL).title("Events");
    frame.render_widget(List::new(items).block(block), area);
}

fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(60, 50, frame.area());
    let lines = vec![
        Line::from("←/→ or h/l   move along the spread"),
        Line::from("Home/End     first / last card"),
        Line::from("Enter/Space  pick the card under the cursor"),
        Line::from("1-9          turn a revealed card over"),
        Line::from("r            shuffle and deal again"),
        Line::from("?            toggle this help"),
        Line::from("q            quit"),
    ];
    let block = Block::default().borders(Borders::ALL).title("Help");
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
