//! UI rendering functions for the TUI.
//!
//! Layout, top to bottom: header, history list beside the detail panel,
//! input box, status line, shortcut bar.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use time::macros::format_description;

use super::app::{App, Focus, InputMode, PREVIEW_CHARS};
use crate::models::{Confidence, Interaction};

/// Main rendering function for the TUI.
pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Shortcut bar
        ])
        .split(size);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(main_chunks[1]);

    render_header(frame, app, main_chunks[0]);
    render_history(frame, app, content_chunks[0]);
    render_detail(frame, app, content_chunks[1]);
    render_input(frame, app, main_chunks[2]);
    render_status(frame, app, main_chunks[3]);
    render_shortcut_bar(frame, app, main_chunks[4]);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Color used for a confidence level everywhere it is shown.
fn confidence_style(confidence: Confidence) -> Style {
    match confidence {
        Confidence::High => Style::default().fg(Color::Green),
        Confidence::Medium => Style::default().fg(Color::Yellow),
        Confidence::Low | Confidence::Error => Style::default().fg(Color::Red),
        Confidence::None | Confidence::Unknown => Style::default(),
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let label = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);
    let prefs = app.preferences();

    let document = match app.session().document() {
        Some(doc) => format!("{} ({} pages)", doc.name(), doc.page_count()),
        None => "none".to_string(),
    };

    let line = Line::from(vec![
        Span::styled("Document: ", label),
        Span::raw(document),
        Span::styled(" | ", dim),
        Span::styled("Model: ", label),
        Span::styled(app.model(), Style::default().fg(Color::Cyan)),
        Span::styled(" | ", dim),
        Span::styled("Confidence: ", label),
        Span::raw(on_off(prefs.show_confidence)),
        Span::styled(" | ", dim),
        Span::styled("Sources: ", label),
        Span::raw(on_off(prefs.show_sources)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Renders the history list, most recent first.
fn render_history(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("History ({})", app.session().len()))
        .border_style(border_style(app.focus() == Focus::History));

    let items: Vec<ListItem> = app
        .session()
        .interactions_recent_first()
        .map(|interaction| {
            let mut spans = vec![Span::raw(interaction.question_preview(40))];
            if interaction.shows_confidence()
                && let Some(confidence) = interaction.result.confidence()
            {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    format!("[{confidence}]"),
                    confidence_style(confidence).add_modifier(Modifier::ITALIC),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::REVERSED),
    );

    let mut list_state = ListState::default();
    list_state.select(app.selected_index());

    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Renders the selected interaction, or the document preview with no selection.
fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let (title, content) = match app.selected_interaction() {
        Some(interaction) => ("Answer", interaction_text(interaction)),
        None => ("Document", document_text(app)),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style(app.focus() == Focus::Detail));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll(), 0));

    frame.render_widget(paragraph, area);
}

fn section(label: &str) -> Line<'static> {
    Line::from(Span::styled(
        label.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn interaction_text(interaction: &Interaction) -> Text<'_> {
    let result = &interaction.result;
    let mut text = Text::default();

    text.lines.push(section("Question:"));
    text.lines.push(Line::from(interaction.question.as_str()));
    text.lines.push(Line::from(""));

    text.lines.push(section("Answer:"));
    if result.is_error() {
        text.lines.push(Line::from(Span::styled(
            result.answer(),
            Style::default().fg(Color::Red),
        )));
    } else {
        text.lines
            .extend(tui_markdown::from_str(result.answer()).lines);
    }

    if interaction.shows_confidence()
        && let Some(confidence) = result.confidence()
    {
        text.lines.push(Line::from(""));
        text.lines.push(Line::from(vec![
            Span::styled("Confidence: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(confidence.as_str(), confidence_style(confidence)),
        ]));
    }

    if interaction.shows_sources()
        && let Some(sources) = result.displayed_sources()
    {
        text.lines.push(Line::from(""));
        text.lines.push(section("Sources:"));
        let style = if result.has_citations() {
            Style::default().add_modifier(Modifier::ITALIC)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        text.lines.push(Line::from(Span::styled(sources, style)));
    }

    if let Some(reasoning) = result.reasoning() {
        text.lines.push(Line::from(""));
        text.lines.push(section("Reasoning:"));
        text.lines.push(Line::from(reasoning));
    }

    let asked_at = interaction
        .asked_at
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_else(|_| "????-??-?? ??:??:??".to_string());

    text.lines.push(Line::from(""));
    text.lines.push(Line::from(Span::styled(
        format!(
            "{} | {} | {} | {}",
            interaction.model, interaction.variant, interaction.document_name, asked_at
        ),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )));

    text
}

fn document_text(app: &App) -> Text<'static> {
    let Some(document) = app.session().document() else {
        return Text::from("No document loaded. Press Ctrl+O to open a PDF.");
    };

    let mut text = Text::default();
    text.lines.push(Line::from(vec![
        Span::styled("Pages: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(document.page_count().to_string()),
        Span::raw("  "),
        Span::styled("Characters: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(document.char_count().to_string()),
    ]));
    text.lines.push(Line::from(""));
    for line in document.preview(PREVIEW_CHARS).lines() {
        text.lines.push(Line::from(line.to_string()));
    }
    text
}

/// Renders the input box with a cursor indicator when focused.
fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus() == Focus::Input;
    let title = match app.input_mode() {
        InputMode::Question => "Question",
        InputMode::OpenPath => "Open PDF (path)",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style(is_focused));

    let mut content = app.input().to_string();
    if is_focused {
        content.push('█');
    }

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let line = match app.status() {
        Some(status) if status.is_error => Line::from(Span::styled(
            status.message.as_str(),
            Style::default().fg(Color::Red),
        )),
        Some(status) => Line::from(Span::styled(
            status.message.as_str(),
            Style::default().fg(Color::Green),
        )),
        None => Line::from(""),
    };

    frame.render_widget(Paragraph::new(line), area);
}

/// Renders context-aware shortcuts as `Key: action | Key: action`.
fn render_shortcut_bar(frame: &mut Frame, app: &App, area: Rect) {
    let key_style = Style::default().fg(Color::Cyan);
    let sep_style = Style::default().fg(Color::DarkGray);

    let mut shortcuts: Vec<(&str, &str)> = vec![
        ("Enter", "submit"),
        ("F2", "model"),
        ("F3", "confidence"),
        ("F4", "sources"),
        ("Ctrl+O", "open"),
        ("Tab", "panel"),
        ("Esc", "back"),
    ];
    match app.focus() {
        Focus::Input => shortcuts.push(("Ctrl+C", "quit")),
        Focus::History => {
            shortcuts.push(("j/k", "navigate"));
            shortcuts.push(("d", "delete"));
            shortcuts.push(("q", "quit"));
        }
        Focus::Detail => {
            shortcuts.push(("j/k", "scroll"));
            shortcuts.push(("q", "quit"));
        }
    }

    let mut spans = Vec::new();
    for (i, (key, action)) in shortcuts.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", sep_style));
        }
        spans.push(Span::styled(key, key_style));
        spans.push(Span::raw(format!(": {action}")));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
