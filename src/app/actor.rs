//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::config::Settings;
use crate::messages::ui_events::InputMode;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        settings: Settings,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(settings),
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Send initial render state
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        tracing::info!("Quit requested");
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Panel navigation
            UiEvent::NextPanel => self.state.next_panel(),
            UiEvent::PrevPanel => self.state.prev_panel(),
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::ScrollDown => self.state.scroll_down(),

            // Input editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Newline => self.state.enter_char('\n'),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),
            UiEvent::NextField => self.state.next_field(),

            // Request actions
            UiEvent::SendRequest => {
                if self.state.input_mode == InputMode::Editing {
                    self.state.stop_editing();
                }
                if let Some(cmd) = self.state.prepare_request() {
                    let _ = self.network_tx.send(cmd);
                }
            }
            UiEvent::CycleMethod => self.state.cycle_method(),
            UiEvent::CycleBodyMode => self.state.cycle_body_mode(),
            UiEvent::CycleAuth => self.state.cycle_auth(),
            UiEvent::TimeoutUp => self.state.timeout_up(),
            UiEvent::TimeoutDown => self.state.timeout_down(),
            UiEvent::ToggleSsl => self.state.toggle_ssl(),

            // Params / headers
            UiEvent::NextRow => self.state.next_row(),
            UiEvent::PrevRow => self.state.prev_row(),
            UiEvent::AddRow => self.state.add_row(),
            UiEvent::DeleteRow => self.state.delete_row(),

            // Presets
            UiEvent::NextPreset => self.state.next_preset(),
            UiEvent::PrevPreset => self.state.prev_preset(),
            UiEvent::LoadPreset => self.state.load_selected_preset(),
            UiEvent::DeletePreset => self.state.delete_selected_preset(),

            // Response
            UiEvent::CycleResponseView => self.state.cycle_response_view(),

            // Prompts
            UiEvent::OpenPrompt(prompt) => self.state.open_prompt(prompt),
            UiEvent::PromptChar(c) => self.state.prompt_char(c),
            UiEvent::PromptBackspace => self.state.prompt_backspace(),
            UiEvent::PromptSubmit => self.state.prompt_submit(),
            UiEvent::PromptCancel => self.state.prompt_cancel(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::render::ResponsePane;
    use crate::models::HttpMethod;

    #[tokio::test]
    async fn test_send_emits_execute_and_renders_loading() {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel();
        let (net_cmd_tx, mut net_cmd_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new(Settings::default(), net_cmd_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, net_resp_rx));

        let initial = render_rx.recv().await.unwrap();
        assert_eq!(initial.request.method, HttpMethod::GET);

        ui_tx.send(UiEvent::CycleMethod).unwrap();
        ui_tx.send(UiEvent::SendRequest).unwrap();

        let (id, spec) = match net_cmd_rx.recv().await.unwrap() {
            NetworkCommand::Execute { id, spec } => (id, spec),
            other => panic!("expected Execute, got {:?}", other),
        };
        assert_eq!(id, 1);
        assert_eq!(spec.method, HttpMethod::POST);

        let _after_cycle = render_rx.recv().await.unwrap();
        let loading = render_rx.recv().await.unwrap();
        assert!(loading.is_loading());

        ui_tx.send(UiEvent::Quit).unwrap();
        assert!(matches!(
            net_cmd_rx.recv().await,
            Some(NetworkCommand::Shutdown)
        ));
        handle.await.unwrap();
        drop(net_resp_tx);
    }

    #[tokio::test]
    async fn test_failure_response_is_rendered() {
        let (_ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel();
        let (net_cmd_tx, _net_cmd_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();

        let mut actor = AppActor::new(Settings::default(), net_cmd_tx, render_tx);
        assert!(!actor.handle_ui_event(UiEvent::SendRequest));
        let handle = tokio::spawn(actor.run(ui_rx, net_resp_rx));
        render_rx.recv().await.unwrap();

        let error = crate::error::TransportError::new(
            crate::error::TransportErrorKind::Connection,
            "connection refused",
        );
        net_resp_tx
            .send(NetworkResponse::Failed { id: 1, error: error.clone() })
            .unwrap();

        let state = render_rx.recv().await.unwrap();
        assert_eq!(state.response, ResponsePane::Failed(error));
        handle.abort();
    }
}
