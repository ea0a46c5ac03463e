use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::{App, Focus, Popup};
use crate::editor::NoticeKind;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1), // Info line
            Constraint::Length(3), // Input box
            Constraint::Min(4),    // Categories
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    draw_info_line(f, app, chunks[0]);
    draw_input_box(f, app, chunks[1]);
    draw_categories(f, app, chunks[2]);
    draw_footer(f, app, chunks[3]);

    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f, app),
        Popup::ConfirmDelete => draw_confirm_popup(f, app),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    // Priority: status toast > request in flight > edit-mode marker > ready
    let line = if let Some(ref notice) = app.status {
        let (icon, color) = match notice.kind {
            NoticeKind::Success => ("✓ ", theme.success),
            NoticeKind::Error => ("✗ ", theme.danger),
        };
        Line::from(vec![
            Span::styled(icon, Style::default().fg(color)),
            Span::styled(notice.message.as_str(), Style::default().fg(color)),
        ])
    } else if app.is_busy() {
        Line::from(Span::styled("Working…", Style::default().fg(theme.warning)))
    } else if let Some(edit) = app.editor.editing() {
        let original = app
            .editor
            .categories()
            .iter()
            .find(|c| c.id == edit.id)
            .map(|c| c.name.as_str())
            .unwrap_or("?");
        Line::from(vec![
            Span::styled("Editing ", Style::default().fg(theme.warning)),
            Span::styled(original, Style::default().fg(theme.text)),
            Span::styled(" │ ", Style::default().fg(theme.text_dim)),
            Span::styled("(Esc cancels)", Style::default().fg(theme.text_dim)),
        ])
    } else {
        Line::from(Span::styled(
            format!("{} categories", app.editor.categories().len()),
            Style::default().fg(theme.text_dim),
        ))
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_input_box(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let is_active = app.focus == Focus::Input;
    let border_color = if is_active { theme.accent } else { theme.inactive };
    let editing = app.editor.editing().is_some();

    let title = if editing { " Rename Category " } else { " New Category " };
    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(border_color)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let text = app.editor.input();
    let content = if text.is_empty() && !is_active {
        Line::from(Span::styled(
            "Press 'a' to add a new category",
            Style::default().fg(theme.text_dim),
        ))
    } else {
        let cursor = if is_active { "_" } else { "" };
        Line::from(vec![
            Span::styled(text, Style::default().fg(theme.text)),
            Span::styled(cursor, Style::default().fg(theme.accent)),
        ])
    };

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn draw_categories(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let is_active = app.focus == Focus::List;
    let border_color = if is_active { theme.accent } else { theme.inactive };
    let title_style = if is_active {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.inactive)
    };

    let block = Block::default()
        .title(Span::styled(" Categories ", title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let header = Row::new(vec![
        Span::styled("", Style::default().fg(theme.header)),
        Span::styled("Name", Style::default().fg(theme.header)),
        Span::styled("ID", Style::default().fg(theme.header)),
    ]);

    let editing_id = app.editor.editing().map(|e| &e.id);

    let rows: Vec<Row> = if app.editor.categories().is_empty() {
        vec![Row::new(vec![
            Span::raw(""),
            Span::styled("No categories", Style::default().fg(theme.text_dim)),
        ])]
    } else {
        app.editor
            .categories()
            .iter()
            .enumerate()
            .map(|(i, category)| {
                let marker = if editing_id == Some(&category.id) {
                    Span::styled("✎", Style::default().fg(theme.warning))
                } else {
                    Span::raw("")
                };

                let row_style = if i == app.selected && is_active {
                    Style::default().bg(theme.bg_selected).fg(theme.text)
                } else {
                    Style::default()
                };

                Row::new(vec![
                    marker,
                    Span::styled(category.name.as_str(), Style::default().fg(theme.text)),
                    Span::styled(category.id.as_str(), Style::default().fg(theme.text_dim)),
                ])
                .style(row_style)
            })
            .collect()
    };

    let widths = vec![
        Constraint::Length(2),
        Constraint::Percentage(75),
        Constraint::Percentage(20),
    ];

    let table = Table::new(rows, widths)
        .header(header.style(Style::default()))
        .block(block);

    f.render_widget(table, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let hints: Vec<(&str, &str)> = match app.focus {
        Focus::List => vec![
            ("↑↓", "Nav"),
            ("a", "Add"),
            ("e", "Edit"),
            ("d", "Del"),
            ("R", "Refresh"),
            ("h", "Help"),
            ("q", "Quit"),
        ],
        Focus::Input => vec![("Enter", "Save"), ("Esc", "Cancel")],
    };

    let max_hints = if area.width < 60 { 4 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(theme.accent)),
                Span::styled(format!(" {} │ ", action), Style::default().fg(theme.text_dim)),
            ]
        })
        .collect();

    f.render_widget(
        Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center),
        area,
    );
}

fn draw_help_popup(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = f.area();
    let popup_area = centered_rect(if area.width < 80 { 95 } else { 60 }, 70, area);

    f.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default().fg(theme.header).add_modifier(Modifier::BOLD),
        ))
    };
    let key = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(keys, Style::default().fg(theme.accent)),
            Span::raw(what),
        ])
    };

    let help_text = vec![
        section("═══ List ═══"),
        key("  ↑/↓ j/k   ", "Move up/down"),
        key("  a i /     ", "Add a new category"),
        key("  e Enter   ", "Rename selected category"),
        key("  d Del     ", "Delete selected category"),
        key("  R         ", "Reload from server"),
        key("  q         ", "Quit"),
        Line::from(""),
        section("═══ Input ═══"),
        key("  Enter     ", "Add / save rename"),
        key("  Esc       ", "Cancel rename, back to list"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(theme.text_dim)),
            Span::styled("Esc", Style::default().fg(theme.accent)),
            Span::styled(" to close", Style::default().fg(theme.text_dim)),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" catnames Help ", Style::default().fg(theme.accent)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn draw_confirm_popup(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let popup_area = centered_rect(40, 20, f.area());

    f.render_widget(Clear, popup_area);

    let name = app.selected_category().map(|c| c.name.as_str()).unwrap_or("?");

    let confirm = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(format!("Delete \"{}\"?", name), Style::default().fg(theme.danger))),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y", Style::default().fg(theme.success).add_modifier(Modifier::BOLD)),
            Span::raw(" Yes   "),
            Span::styled("n", Style::default().fg(theme.danger).add_modifier(Modifier::BOLD)),
            Span::raw(" No"),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Confirm ", Style::default().fg(theme.danger)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.danger)),
    )
    .alignment(Alignment::Center);

    f.render_widget(confirm, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}
