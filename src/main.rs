//! Courier - Actor-based HTTP request composer for the terminal
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async HTTP execution

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use courier_tui::config::Settings;
use courier_tui::constants::{APP_NAME, APP_VERSION, DEFAULT_LOG_FILE};
use courier_tui::error::{BuildError, TransportErrorKind};
use courier_tui::messages::render::ResponsePane;
use courier_tui::messages::ui_events::{
    key_to_ui_event, AuthField, InputMode, Panel, Prompt, ResponseView,
};
use courier_tui::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use courier_tui::models::{AuthConfig, BodyMode};
use courier_tui::ui::{self, highlight_json, method_color, notice_color, status_color};
use courier_tui::viewer::BodyView;
use courier_tui::{AppActor, NetworkActor, ReqwestTransport};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (settings, settings_error) = Settings::load();

    // Initialize logging to file
    let log_path = settings.log_file.as_path();
    let log_dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let log_name = log_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.into());
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    tracing::info!(version = APP_VERSION, download_dir = %settings.download_dir.display(), "Starting");
    match settings_error {
        Some(e) => tracing::warn!("Ignoring unreadable settings file: {:#}", e),
        None => tracing::debug!(?settings, "Settings loaded"),
    }

    let transport = ReqwestTransport::new()?;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(transport, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(settings, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Exiting");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.active_panel,
                    current_state.input_mode,
                    current_state.show_help,
                    current_state.prompt,
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Method + URL
            Constraint::Min(0),    // Request + response / presets
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_url_bar(f, state, main_chunks[0]);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(30)])
        .split(main_chunks[1]);

    let work_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(5)])
        .split(body_chunks[0]);

    draw_request_panels(f, state, work_chunks[0]);
    draw_response(f, state, work_chunks[1]);
    draw_presets(f, state, body_chunks[1]);
    draw_status_bar(f, state, main_chunks[2]);

    // Popups
    if state.show_help {
        draw_help_popup(f, area);
    }

    if let Some(prompt) = state.prompt {
        draw_prompt_popup(f, state, prompt, area);
    }
}

fn border_style(state: &RenderState, panel: Panel) -> Style {
    let is_focused = state.active_panel == panel;
    if is_focused && state.input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn is_editing(state: &RenderState, panel: Panel) -> bool {
    state.active_panel == panel && state.input_mode == InputMode::Editing
}

/// Column and line of a byte cursor inside possibly multi-line text
fn cursor_offset(text: &str, cursor: usize) -> (u16, u16) {
    let before = &text[..cursor.min(text.len())];
    let line = before.matches('\n').count();
    let col = before.rsplit('\n').next().map_or(0, |l| l.chars().count());
    (col as u16, line as u16)
}

fn place_cursor(f: &mut Frame, area: Rect, col: u16, line: u16) {
    let max_x = area.x + area.width.saturating_sub(2);
    let max_y = area.y + area.height.saturating_sub(2);
    let x = (area.x + 1 + col).min(max_x);
    let y = (area.y + 1 + line).min(max_y);
    f.set_cursor_position(Position::new(x, y));
}

fn draw_url_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let request = &state.request;
    let loading = if state.is_loading() { " [...]" } else { "" };
    let ssl = if request.verify_ssl { "SSL on" } else { "SSL off" };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(state, Panel::Url))
        .title(Line::from(format!(" {}{} ", request.method, loading)))
        .title_style(Style::default().fg(method_color(request.method)).bold())
        .title(
            Line::from(format!(" timeout {:.0}s | {} ", request.timeout_secs, ssl))
                .right_aligned()
                .style(Style::default().fg(if request.verify_ssl {
                    Color::DarkGray
                } else {
                    Color::Red
                })),
        );

    if let Some(BuildError::InvalidUrl(msg)) = &state.build_error {
        block = block.title_bottom(
            Line::from(format!(" {} ", msg)).style(Style::default().fg(Color::Red)),
        );
    }

    let input = Paragraph::new(request.url.as_str()).block(block);
    f.render_widget(input, area);

    if is_editing(state, Panel::Url) {
        let (col, _) = cursor_offset(&request.url, state.cursor_position);
        place_cursor(f, area, col, 0);
    }
}

fn draw_request_panels(f: &mut Frame, state: &RenderState, area: Rect) {
    let tabs_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let tab_titles = ["Params", "Headers", "Body", "Auth"];
    let selected_tab = match state.active_panel {
        Panel::Headers => 1,
        Panel::Body => 2,
        Panel::Auth => 3,
        _ => 0,
    };

    let tabs = ui::render_tabs(&tab_titles, selected_tab);
    f.render_widget(tabs, tabs_area[0]);

    let content_area = tabs_area[1];
    match selected_tab {
        1 => draw_table_panel(f, state, Panel::Headers, content_area),
        2 => draw_body_panel(f, state, content_area),
        3 => draw_auth_panel(f, state, content_area),
        _ => draw_table_panel(f, state, Panel::Params, content_area),
    }
}

fn draw_table_panel(f: &mut Frame, state: &RenderState, panel: Panel, area: Rect) {
    let (rows, selected, title) = match panel {
        Panel::Headers => (
            &state.request.headers,
            state.selected_header,
            " Headers (a:add d:del e:edit Tab:key/value) ",
        ),
        _ => (
            &state.request.query_params,
            state.selected_param,
            " Query Params (a:add d:del e:edit Tab:key/value) ",
        ),
    };

    let editing = is_editing(state, panel).then_some(state.row_field);
    let table = ui::render_key_value_table(rows, selected, editing, state.active_panel == panel)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(state, panel))
                .title(title),
        );
    f.render_widget(table, area);
}

fn draw_body_panel(f: &mut Frame, state: &RenderState, area: Rect) {
    let request = &state.request;

    let mut title = format!(" Body: {} (b:mode) ", request.body_mode.as_str());
    if request.body_mode != BodyMode::None && request.method.usually_bodyless() {
        title.push_str(&format!("- {} usually has no body ", request.method));
    }

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(state, Panel::Body))
        .title(title);

    if let Some(BuildError::InvalidBody(msg)) = &state.build_error {
        block = block.title_bottom(
            Line::from(format!(" {} ", msg)).style(Style::default().fg(Color::Red)),
        );
    }

    let body = if request.body_mode == BodyMode::None && !is_editing(state, Panel::Body) {
        Paragraph::new("No body is sent. Press 'b' to switch to JSON or Raw.")
            .style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(request.body.as_str())
    };
    f.render_widget(body.block(block), area);

    if is_editing(state, Panel::Body) {
        let (col, line) = cursor_offset(&request.body, state.cursor_position);
        place_cursor(f, area, col, line);
    }
}

fn draw_auth_panel(f: &mut Frame, state: &RenderState, area: Rect) {
    let editing = is_editing(state, Panel::Auth);
    let active = Style::default().fg(Color::Yellow);

    let (lines, cursor): (Vec<Line>, Option<(u16, u16)>) = match &state.request.auth {
        AuthConfig::None => (
            vec![Line::from(Span::styled(
                "No auth. Press 't' to cycle auth type.",
                Style::default().fg(Color::DarkGray),
            ))],
            None,
        ),
        AuthConfig::Bearer { token } => {
            let label = "Token:    ";
            let col = cursor_offset(token, state.cursor_position).0;
            (
                vec![Line::from(vec![Span::raw(label), Span::raw(token.as_str())])],
                Some((label.len() as u16 + col, 0)),
            )
        }
        AuthConfig::Basic { username, password } => {
            let on_password = state.auth_field == AuthField::Password;
            let field_style = |selected: bool| {
                if editing && selected {
                    active
                } else {
                    Style::default()
                }
            };
            let masked = "*".repeat(password.chars().count());
            let label = "Username: ";
            let (text, line) = if on_password {
                (password.as_str(), 1)
            } else {
                (username.as_str(), 0)
            };
            let col = cursor_offset(text, state.cursor_position).0;
            (
                vec![
                    Line::from(vec![
                        Span::styled(label, field_style(!on_password)),
                        Span::raw(username.as_str()),
                    ]),
                    Line::from(vec![
                        Span::styled("Password: ", field_style(on_password)),
                        Span::raw(masked),
                    ]),
                ],
                Some((label.len() as u16 + col, line)),
            )
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(state, Panel::Auth))
        .title(format!(" Auth: {} (t:cycle) ", state.request.auth.label()));

    f.render_widget(Paragraph::new(lines).block(block), area);

    if let (true, Some((col, line))) = (editing, cursor) {
        place_cursor(f, area, col, line);
    }
}

fn draw_response(f: &mut Frame, state: &RenderState, area: Rect) {
    let view_label = match state.response_view {
        ResponseView::Body => "Body",
        ResponseView::Headers => "Headers",
        ResponseView::Curl => "cURL",
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(state, Panel::Response));

    let lines: Vec<Line> = match (&state.response, state.response_view) {
        (_, ResponseView::Curl) => match &state.curl_preview {
            Some(curl) => curl.lines().map(|l| Line::from(l.to_string())).collect(),
            None => vec![hint("Send a request to see its cURL equivalent.")],
        },
        (ResponsePane::Empty, _) => vec![hint("Press 's' to send the request.")],
        (ResponsePane::Loading, _) => vec![hint("Sending...")],
        (ResponsePane::Failed(error), _) => {
            let mut lines = vec![Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red).bold(),
            ))];
            if error.kind == TransportErrorKind::Ssl {
                lines.push(hint("Press 'v' to turn off certificate verification for test servers."));
            }
            lines
        }
        (ResponsePane::Received(display), ResponseView::Headers) => {
            highlight_json(&display.headers_json())
        }
        (ResponsePane::Received(display), ResponseView::Body) => match &display.body {
            BodyView::Json(pretty) => highlight_json(pretty),
            BodyView::Text(text) => text.lines().map(|l| Line::from(l.to_string())).collect(),
        },
    };

    match &state.response {
        ResponsePane::Received(display) => {
            block = block
                .title(Span::styled(
                    format!(" {} ", display.status),
                    Style::default().fg(status_color(display.status)).bold(),
                ))
                .title(format!("[{}] ", view_label))
                .title_bottom(Line::from(format!(" {} ", display.final_url)))
                .title_bottom(
                    Line::from(format!(
                        " {} ms | {} bytes ",
                        display.elapsed_ms, display.size_bytes
                    ))
                    .right_aligned(),
                );
        }
        _ => {
            block = block.title(format!(" Response [{}] (r:view f:save) ", view_label));
        }
    }

    let response = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.response_scroll, 0));
    f.render_widget(response, area);
}

fn hint(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::DarkGray),
    ))
}

fn draw_presets(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Presets;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(state, Panel::Presets))
        .title(" Presets (p:save) ");

    if state.presets.is_empty() {
        let empty = Paragraph::new("No presets yet.\nPress 'p' to save the current request.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: false })
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state
        .presets
        .iter()
        .map(|p| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:7}", p.method.as_str()),
                    Style::default().fg(method_color(p.method)).bold(),
                ),
                Span::raw(p.name.clone()),
                Span::styled(format!(" {}", p.saved_at), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let highlight_style = if is_focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default()
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style);

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_preset));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let line = if let Some(notice) = &state.notice {
        Line::from(Span::styled(
            format!(" {} ", notice.text),
            Style::default().fg(notice_color(notice.level)),
        ))
    } else if state.is_loading() {
        Line::from(" Sending... ")
    } else if state.input_mode == InputMode::Editing {
        Line::from(" Esc:stop editing | arrows:move | Tab:next field | Ctrl+S:send ")
    } else {
        Line::from(" Tab:panel | e:edit | m:method | s:send | p:preset | ?:help | q:quit ")
    };

    let bar = Paragraph::new(line).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 80, area);

    let help_text = r#"
 NAVIGATION
   Tab / Shift+Tab    Switch panels
   Up / Down          Rows, presets, response scroll

 REQUEST
   m                  Cycle HTTP method
   s / Ctrl+S         Send request
   e / Enter          Edit focused field
   + / -              Timeout up / down
   v                  Toggle SSL verification

 PARAMS / HEADERS
   a / d              Add / delete row
   Tab (editing)      Switch key / value

 BODY / AUTH
   b                  Cycle body mode (None/JSON/Raw)
   t                  Cycle auth type (None/Bearer/Basic)

 RESPONSE
   r                  Cycle Body / Headers / cURL
   f                  Save body to a file

 PRESETS
   p                  Save current request
   Enter / d          Load / delete selected

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} {} - Help ", APP_NAME, APP_VERSION))
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn draw_prompt_popup(f: &mut Frame, state: &RenderState, prompt: Prompt, area: Rect) {
    let popup_area = centered_rect(50, 20, area);

    let title = match prompt {
        Prompt::PresetName => " Save Preset (Enter to save, Esc to cancel) ",
        Prompt::DownloadName => " Save Body As (Enter to save, Esc to cancel) ",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().bg(Color::Black));

    let input = Paragraph::new(state.prompt_buffer.as_str())
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(input, popup_area);

    let col = state.prompt_buffer.chars().count() as u16;
    place_cursor(f, popup_area, col, 0);
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
