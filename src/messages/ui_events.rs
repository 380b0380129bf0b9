//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Panel navigation
    NextPanel,
    PrevPanel,
    ScrollUp,
    ScrollDown,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Newline,
    Backspace,
    CursorLeft,
    CursorRight,
    /// Key <-> value in tables, username <-> password in Basic auth
    NextField,

    // Request actions
    SendRequest,
    CycleMethod,
    CycleBodyMode,
    CycleAuth,
    TimeoutUp,
    TimeoutDown,
    ToggleSsl,

    // Params / headers tables
    NextRow,
    PrevRow,
    AddRow,
    DeleteRow,

    // Presets sidebar
    NextPreset,
    PrevPreset,
    LoadPreset,
    DeletePreset,

    // Response panel
    CycleResponseView,

    // Text prompts (preset name, download file name)
    OpenPrompt(Prompt),
    PromptChar(char),
    PromptBackspace,
    PromptSubmit,
    PromptCancel,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Focusable panels, in Tab order
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Panel {
    Url,
    Params,
    Headers,
    Body,
    Auth,
    Response,
    Presets,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::Url => Panel::Params,
            Panel::Params => Panel::Headers,
            Panel::Headers => Panel::Body,
            Panel::Body => Panel::Auth,
            Panel::Auth => Panel::Response,
            Panel::Response => Panel::Presets,
            Panel::Presets => Panel::Url,
        }
    }

    pub fn prev(&self) -> Panel {
        match self {
            Panel::Url => Panel::Presets,
            Panel::Params => Panel::Url,
            Panel::Headers => Panel::Params,
            Panel::Body => Panel::Headers,
            Panel::Auth => Panel::Body,
            Panel::Response => Panel::Auth,
            Panel::Presets => Panel::Response,
        }
    }

    /// Whether the panel has a text field that `e` can edit
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            Panel::Url | Panel::Params | Panel::Headers | Panel::Body | Panel::Auth
        )
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Which cell of a key/value row is being edited
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RowField {
    Key,
    Value,
}

/// Auth editing field
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AuthField {
    Token,
    Username,
    Password,
}

/// What the response panel is showing
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ResponseView {
    #[default]
    Body,
    Headers,
    Curl,
}

impl ResponseView {
    pub fn next(&self) -> ResponseView {
        match self {
            ResponseView::Body => ResponseView::Headers,
            ResponseView::Headers => ResponseView::Curl,
            ResponseView::Curl => ResponseView::Body,
        }
    }
}

/// Single-line text prompts shown as popups
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Prompt {
    PresetName,
    DownloadName,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    input_mode: InputMode,
    show_help: bool,
    prompt: Option<Prompt>,
) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Global Ctrl shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            KeyCode::Char('s') => return Some(UiEvent::SendRequest),
            _ => {}
        }
    }

    // Handle popups first
    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    if prompt.is_some() {
        return match key.code {
            KeyCode::Esc => Some(UiEvent::PromptCancel),
            KeyCode::Enter => Some(UiEvent::PromptSubmit),
            KeyCode::Backspace => Some(UiEvent::PromptBackspace),
            KeyCode::Char(c) => Some(UiEvent::PromptChar(c)),
            _ => None,
        };
    }

    match input_mode {
        InputMode::Normal => normal_mode_keys(key, active_panel),
        InputMode::Editing => editing_mode_keys(key, active_panel),
    }
}

fn normal_mode_keys(key: KeyEvent, active_panel: Panel) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Tab => Some(UiEvent::NextPanel),
        KeyCode::BackTab => Some(UiEvent::PrevPanel),
        KeyCode::Char('s') => Some(UiEvent::SendRequest),
        KeyCode::Char('m') => Some(UiEvent::CycleMethod),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(UiEvent::TimeoutUp),
        KeyCode::Char('-') => Some(UiEvent::TimeoutDown),
        KeyCode::Char('v') => Some(UiEvent::ToggleSsl),
        KeyCode::Char('p') => Some(UiEvent::OpenPrompt(Prompt::PresetName)),
        KeyCode::Char('f') => Some(UiEvent::OpenPrompt(Prompt::DownloadName)),
        KeyCode::Char('r') => Some(UiEvent::CycleResponseView),
        KeyCode::Char('e') if active_panel.is_editable() => Some(UiEvent::StartEditing),
        KeyCode::Enter => match active_panel {
            Panel::Presets => Some(UiEvent::LoadPreset),
            Panel::Response => None,
            _ => Some(UiEvent::StartEditing),
        },
        KeyCode::Up => match active_panel {
            Panel::Params | Panel::Headers => Some(UiEvent::PrevRow),
            Panel::Response => Some(UiEvent::ScrollUp),
            Panel::Presets => Some(UiEvent::PrevPreset),
            _ => None,
        },
        KeyCode::Down => match active_panel {
            Panel::Params | Panel::Headers => Some(UiEvent::NextRow),
            Panel::Response => Some(UiEvent::ScrollDown),
            Panel::Presets => Some(UiEvent::NextPreset),
            _ => None,
        },
        KeyCode::Char('a') if matches!(active_panel, Panel::Params | Panel::Headers) => {
            Some(UiEvent::AddRow)
        }
        KeyCode::Char('d') => match active_panel {
            Panel::Params | Panel::Headers => Some(UiEvent::DeleteRow),
            Panel::Presets => Some(UiEvent::DeletePreset),
            _ => None,
        },
        KeyCode::Char('b') if active_panel == Panel::Body => Some(UiEvent::CycleBodyMode),
        KeyCode::Char('t') if active_panel == Panel::Auth => Some(UiEvent::CycleAuth),
        _ => None,
    }
}

fn editing_mode_keys(key: KeyEvent, active_panel: Panel) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::StopEditing),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        KeyCode::Tab => match active_panel {
            Panel::Params | Panel::Headers | Panel::Auth => Some(UiEvent::NextField),
            _ => None,
        },
        KeyCode::Enter => match active_panel {
            Panel::Url => Some(UiEvent::SendRequest),
            Panel::Body => Some(UiEvent::Newline),
            _ => Some(UiEvent::StopEditing),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_panel_cycle_is_closed() {
        let mut panel = Panel::Url;
        for _ in 0..7 {
            assert_eq!(panel.next().prev(), panel);
            panel = panel.next();
        }
        assert_eq!(panel, Panel::Url);
    }

    #[test]
    fn test_context_sensitive_keys() {
        let ev = |code, panel| key_to_ui_event(press(code), panel, InputMode::Normal, false, None);

        assert_eq!(ev(KeyCode::Char('d'), Panel::Headers), Some(UiEvent::DeleteRow));
        assert_eq!(ev(KeyCode::Char('d'), Panel::Presets), Some(UiEvent::DeletePreset));
        assert_eq!(ev(KeyCode::Char('d'), Panel::Url), None);
        assert_eq!(ev(KeyCode::Enter, Panel::Presets), Some(UiEvent::LoadPreset));
        assert_eq!(ev(KeyCode::Char('b'), Panel::Body), Some(UiEvent::CycleBodyMode));
        assert_eq!(ev(KeyCode::Char('t'), Panel::Auth), Some(UiEvent::CycleAuth));
        assert_eq!(ev(KeyCode::Char('e'), Panel::Response), None);
    }

    #[test]
    fn test_editing_keys() {
        let ev = |code, panel| key_to_ui_event(press(code), panel, InputMode::Editing, false, None);

        assert_eq!(ev(KeyCode::Char('q'), Panel::Url), Some(UiEvent::CharInput('q')));
        assert_eq!(ev(KeyCode::Enter, Panel::Url), Some(UiEvent::SendRequest));
        assert_eq!(ev(KeyCode::Enter, Panel::Body), Some(UiEvent::Newline));
        assert_eq!(ev(KeyCode::Tab, Panel::Headers), Some(UiEvent::NextField));
    }

    #[test]
    fn test_prompt_and_help_take_priority() {
        let prompt = Some(Prompt::PresetName);
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('q')), Panel::Url, InputMode::Normal, false, prompt),
            Some(UiEvent::PromptChar('q'))
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('s')), Panel::Url, InputMode::Normal, true, None),
            Some(UiEvent::CloseHelp)
        );
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            key_to_ui_event(ctrl_c, Panel::Url, InputMode::Editing, false, prompt),
            Some(UiEvent::Quit)
        );
    }
}
