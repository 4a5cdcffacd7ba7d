use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use super::app::{App, FormField, InputMode};

pub fn render_expense_list(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .filtered
        .iter()
        .map(|&idx| app.store.expenses()[idx].to_list_item())
        .collect();

    let header = format!(
        "Expenses ({} total, {} shown) Total: ₹{:.2}",
        app.store.len(),
        app.filtered.len(),
        app.store.total()
    );

    let list = List::new(items)
        .block(Block::default().title(header).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::REVERSED)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("➤ ");

    f.render_stateful_widget(list, area, &mut app.list_state.clone());
}

pub fn render_summary_panel(f: &mut Frame, app: &App, area: Rect) {
    let text = if app.summary.loading {
        Line::from("Summarizing expenses...").style(Style::default().fg(Color::DarkGray))
    } else if let Some(summary) = app.summary.text.as_deref() {
        Line::from(summary)
    } else if !app.summaries_available() {
        Line::from("Summaries unavailable (set SUMMARY_API_URL and SUMMARY_API_KEY)")
            .style(Style::default().fg(Color::DarkGray))
    } else {
        Line::from("Add an expense to see a summary").style(Style::default().fg(Color::DarkGray))
    };

    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Expense Summary")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    f.render_widget(paragraph, area);
}

pub fn render_help_panel(f: &mut Frame, area: Rect) {
    let text = vec![Line::from(vec![
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Move • "),
        Span::styled("a", Style::default().fg(Color::Yellow)),
        Span::raw(" Add • "),
        Span::styled("d", Style::default().fg(Color::Yellow)),
        Span::raw(" Delete • "),
        Span::styled("f", Style::default().fg(Color::Yellow)),
        Span::raw(" Filter • "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" Clear filter • "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ])];

    let help = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Help "),
        )
        .alignment(ratatui::layout::Alignment::Center);

    f.render_widget(help, area);
}

pub fn render_filter_prompt(f: &mut Frame, app: &App, area: Rect) {
    let input = Paragraph::new(if app.filter.is_empty() {
        Line::from("Type to filter expenses by description...")
            .style(Style::default().fg(Color::DarkGray))
    } else {
        Line::from(app.filter.as_str())
    })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Filter (Enter to keep, Esc to clear)")
            .border_style(Style::default().fg(Color::Yellow)),
    );

    let popup_area = centered_rect(60, 10, area);
    f.render_widget(Clear, popup_area);
    f.render_widget(input, popup_area);
}

pub fn render_expense_form(f: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect(60, 40, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title("Add Expense (Tab next field, Enter save, Esc cancel)")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(inner);

    render_form_field(
        f,
        chunks[0],
        "Description",
        &app.form.description,
        "Expense description",
        app.form.focus == FormField::Description,
    );
    render_form_field(
        f,
        chunks[1],
        "Amount",
        &app.form.amount,
        "Amount",
        app.form.focus == FormField::Amount,
    );
    render_form_field(
        f,
        chunks[2],
        "Date",
        &app.form.date,
        "YYYY-MM-DD",
        app.form.focus == FormField::Date,
    );

    if let Some(error) = app.form.error.as_deref() {
        let error = Paragraph::new(Line::from(error).style(Style::default().fg(Color::Red)))
            .alignment(ratatui::layout::Alignment::Center);
        f.render_widget(error, chunks[3]);
    }
}

fn render_form_field(
    f: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    placeholder: &str,
    focused: bool,
) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let input = Paragraph::new(if value.is_empty() {
        Line::from(placeholder).style(Style::default().fg(Color::DarkGray))
    } else {
        Line::from(value)
    })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style),
    );

    f.render_widget(input, area);
}

pub fn render_input_overlays(f: &mut Frame, app: &App, area: Rect) {
    match app.input_mode {
        InputMode::Filtering => render_filter_prompt(f, app, area),
        InputMode::Adding => render_expense_form(f, app, area),
        InputMode::Normal => {}
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(layout[1])[1]
}
