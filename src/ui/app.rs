//! Main application struct and eframe integration

use egui::{CentralPanel, RichText, TopBottomPanel};
use std::time::Instant;

use crate::config::AppConfig;
use crate::session::{ControllerCommand, ControllerEvent, ControllerHandle, RecordingPhase, Stage};
use crate::ui::components::{record_button::RecordAction, MessageList, RecordButton, ReportView, TopicGrid};
use crate::ui::state::UiState;
use crate::ui::theme::Theme;

pub struct VivaApp {
    handle: ControllerHandle,
    config: AppConfig,
    theme: Theme,
    ui_state: UiState,
}

impl VivaApp {
    pub fn new(cc: &eframe::CreationContext<'_>, handle: ControllerHandle, config: AppConfig) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        let ui_state = UiState::new(config.error_clear_after);

        Self {
            handle,
            config,
            theme,
            ui_state,
        }
    }

    fn send(&self, cmd: ControllerCommand) {
        if let Err(e) = self.handle.send_command(cmd) {
            tracing::error!("Failed to send command: {}", e);
        }
    }

    fn poll_events(&mut self) {
        while let Some(event) = self.handle.try_recv_event() {
            match event {
                ControllerEvent::SessionConfigured { .. } => {
                    self.ui_state.configuring = false;
                    self.ui_state.awaiting_turn = true;
                }
                ControllerEvent::TurnCompleted { .. } => {
                    self.ui_state.awaiting_turn = false;
                }
                ControllerEvent::EvaluationReady(entries) => {
                    self.ui_state.loading_evaluation = false;
                    self.ui_state.report = Some(entries);
                }
                ControllerEvent::Error(message) => {
                    self.ui_state.configuring = false;
                    self.ui_state.awaiting_turn = false;
                    self.ui_state.loading_evaluation = false;
                    self.ui_state.set_error(message);
                }
                ControllerEvent::TopicsChanged
                | ControllerEvent::StageChanged(_)
                | ControllerEvent::RecordingStarted
                | ControllerEvent::RecordingStopped
                | ControllerEvent::Shutdown => {}
            }
        }
    }

    fn show_header(&self, ctx: &egui::Context, stage: Stage) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Viva")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    let subtitle = match stage {
                        Stage::Home => "Mock Interview",
                        Stage::Chat => "Interview in progress",
                        Stage::Evaluation => "Evaluation",
                    };
                    ui.label(
                        RichText::new(subtitle)
                            .size(14.0)
                            .color(self.theme.text_muted),
                    );
                });
            });
    }

    fn show_error_banner(&mut self, ctx: &egui::Context) {
        let message = self
            .ui_state
            .visible_error(Instant::now())
            .map(|s| s.to_string());
        if let Some(message) = message {
            TopBottomPanel::bottom("error_banner")
                .frame(
                    egui::Frame::none()
                        .fill(self.theme.error.gamma_multiply(0.2))
                        .inner_margin(self.theme.spacing_sm),
                )
                .show(ctx, |ui| {
                    ui.label(RichText::new(message).color(self.theme.error));
                });
            // Keep repainting so the banner disappears without input
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }

    fn show_home(&mut self, ctx: &egui::Context) {
        let session = self.handle.session();
        let mut toggled: Option<String> = None;
        let mut start_clicked = false;

        CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing_lg),
            )
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(self.theme.spacing_lg);
                    ui.heading(
                        RichText::new(format!("{} Interview", self.config.role))
                            .color(self.theme.text_primary),
                    );
                    ui.label(
                        RichText::new("Select the topics you want to be asked about.")
                            .color(self.theme.text_muted),
                    );
                });

                ui.add_space(self.theme.spacing_lg);

                toggled =
                    TopicGrid::new(&self.config.topics, session.selected_topics(), &self.theme)
                        .show(ui);

                ui.add_space(self.theme.spacing_lg);

                ui.vertical_centered(|ui| {
                    let startable = session.can_start() && !self.ui_state.configuring;
                    let label = if self.ui_state.configuring {
                        "Starting..."
                    } else {
                        "Start Interview"
                    };
                    if ui
                        .add_enabled(startable, egui::Button::new(label))
                        .clicked()
                    {
                        start_clicked = true;
                    }
                    if session.selected_topics().is_empty() {
                        ui.add_space(self.theme.spacing_sm);
                        ui.label(
                            RichText::new("Pick at least one topic to begin.")
                                .size(12.0)
                                .color(self.theme.text_muted),
                        );
                    }
                });
            });

        if let Some(topic) = toggled {
            self.send(ControllerCommand::ToggleTopic(topic));
        }
        if start_clicked {
            self.ui_state.configuring = true;
            self.send(ControllerCommand::StartInterview);
        }
    }

    fn show_chat(&mut self, ctx: &egui::Context) {
        let session = self.handle.session();
        let mut record_action: Option<RecordAction> = None;
        let mut eval_clicked = false;

        TopBottomPanel::bottom("chat_controls")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                if session.can_enter_evaluation() {
                    ui.vertical_centered(|ui| {
                        let label = if self.ui_state.loading_evaluation {
                            "Loading evaluation..."
                        } else {
                            "View Evaluation"
                        };
                        if ui
                            .add_enabled(
                                !self.ui_state.loading_evaluation,
                                egui::Button::new(label),
                            )
                            .clicked()
                        {
                            eval_clicked = true;
                        }
                    });
                    return;
                }

                let enabled = session.can_record()
                    || session.recording_phase() == RecordingPhase::Recording;
                record_action =
                    RecordButton::new(session.recording_phase(), enabled, &self.theme).show(ui);

                if self.ui_state.awaiting_turn || session.request_in_flight() {
                    ui.vertical_centered(|ui| {
                        ui.label(
                            RichText::new("Waiting for the next question...")
                                .size(12.0)
                                .color(self.theme.text_muted),
                        );
                    });
                }
            });

        match record_action {
            Some(RecordAction::Start) => self.send(ControllerCommand::BeginRecording),
            Some(RecordAction::Stop) => self.send(ControllerCommand::EndRecording),
            None => {}
        }
        if eval_clicked {
            self.ui_state.loading_evaluation = true;
            self.send(ControllerCommand::EnterEvaluation);
        }

        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary))
            .show(ctx, |ui| {
                let messages = self.handle.transcript().get_all();
                MessageList::new(&messages, &self.theme).show(ui);
            });
    }

    fn show_evaluation(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                ui.heading(RichText::new("Evaluation").color(self.theme.text_primary));
                ui.add_space(self.theme.spacing);
                let entries = self.ui_state.report.as_deref().unwrap_or(&[]);
                ReportView::new(entries, &self.theme).show(ui);
            });
    }
}

impl eframe::App for VivaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();

        let stage = self.handle.session().stage();
        self.show_header(ctx, stage);
        self.show_error_banner(ctx);

        match stage {
            Stage::Home => self.show_home(ctx),
            Stage::Chat => self.show_chat(ctx),
            Stage::Evaluation => self.show_evaluation(ctx),
        }

        // Backend events arrive on their own thread; keep polling
        if self.ui_state.busy()
            || self.handle.session().recording_phase() != RecordingPhase::Idle
        {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        let _ = self.handle.send_command(ControllerCommand::Shutdown);
    }
}
