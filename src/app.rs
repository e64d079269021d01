use crate::{
    catalog::{self, MODELS},
    clipboard,
    config::Settings,
    error::{PlaygroundError, PlaygroundResult},
    session::{SessionManager, Summary, TokenRow},
    token_view::{format_count, token_color, tokens_for_copy, PLACEHOLDER},
    worker::{TokenizeRequest, Worker, WorkerUpdate},
};
use eframe::egui::{self, Color32, RichText};
use std::{sync::Arc, time::Duration};

const CHIP_TEXT: Color32 = Color32::from_rgb(20, 20, 20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Idle,
    Loading,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub kind: StatusKind,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            text: "Idle".to_owned(),
            kind: StatusKind::Idle,
        }
    }
}

pub struct PlaygroundApp {
    pub sessions: Arc<SessionManager>,
    pub model_id: String,
    pub hf_token: String,
    pub prompt: String,
    pub status: Status,
    /// `None` until the first successful run, and again after Clear.
    pub summary: Option<Summary>,
    pub rows: Vec<TokenRow>,

    pub worker: Worker,
}

impl PlaygroundApp {
    pub fn new(sessions: Arc<SessionManager>, settings: &Settings) -> Self {
        Self {
            sessions,
            model_id: settings.initial_model().to_owned(),
            hf_token: settings.token.clone().unwrap_or_default(),
            prompt: String::new(),
            status: Status::default(),
            summary: None,
            rows: Vec::new(),
            worker: Worker::default(),
        }
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Status {
            text: text.into(),
            kind,
        };
    }

    fn auth_token(&self) -> Option<String> {
        (!self.hf_token.is_empty()).then(|| self.hf_token.clone())
    }

    pub fn tokenize(&mut self) {
        if self.prompt.trim().is_empty() {
            self.set_status(PlaygroundError::EmptyPrompt.to_string(), StatusKind::Error);
            return;
        }
        self.set_status("Tokenizing...", StatusKind::Loading);
        let request = TokenizeRequest {
            prompt: self.prompt.clone(),
            model_id: self.model_id.clone(),
            auth_token: self.auth_token(),
        };
        self.worker
            .spawn_tokenize(Arc::clone(&self.sessions), request);
    }

    pub fn apply_update(&mut self, update: WorkerUpdate) {
        match update {
            WorkerUpdate::Loading { model_id } => {
                self.set_status(format!("Loading {} tokenizer...", model_id), StatusKind::Loading);
            }
            WorkerUpdate::Done {
                model_id,
                result: Ok(tokenized),
            } => {
                tracing::debug!(
                    %model_id,
                    tokens = tokenized.summary.token_count,
                    specials = tokenized.summary.special_count,
                    "tokenized"
                );
                self.rows = tokenized.rows;
                self.summary = Some(tokenized.summary);
                self.set_status(format!("Tokenized with {}", model_id), StatusKind::Idle);
            }
            WorkerUpdate::Done {
                result: Err(err), ..
            } => {
                self.set_status(err.to_string(), StatusKind::Error);
            }
        }
    }

    pub fn clear_all(&mut self) {
        self.prompt.clear();
        self.rows.clear();
        self.summary = None;
        self.status = Status::default();
    }

    /// Drop every loaded tokenizer; the next run refetches from the hub.
    pub fn unload_tokenizers(&mut self) {
        self.sessions.clear_cache();
        self.set_status("Tokenizer cache cleared.", StatusKind::Idle);
    }

    pub fn copy_tokens(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let result = clipboard::write_text(&tokens_for_copy(&self.rows));
        self.apply_copy_result(result);
    }

    pub fn apply_copy_result(&mut self, result: PlaygroundResult<()>) {
        match result {
            Ok(()) => self.set_status("Tokens copied to clipboard.", StatusKind::Idle),
            Err(err) => {
                tracing::warn!(error = ?err, "clipboard write failed");
                self.set_status(err.to_string(), StatusKind::Error);
            }
        }
    }

    fn header_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header_panel").show(ctx, |ui| {
            ui.label(RichText::new("Tokenizer playground").small().weak());
            ui.heading("See how GPT, LLaMA, and other models chop your prompt into tokens.");
            ui.label(
                "Pick a model, type a prompt, and visualize the token boundaries, IDs, and vocabulary size.",
            );
            ui.add_space(4.0);
        });
    }

    fn footer_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("footer_panel")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Powered by");
                    ui.code("tokenizers");
                    ui.label("- models load from the Hugging Face Hub, no data is sent to a custom server.");
                });
            });
    }

    fn status_pill(&self, ui: &mut egui::Ui) {
        let color = match self.status.kind {
            StatusKind::Idle => Color32::GRAY,
            StatusKind::Loading => Color32::from_rgb(240, 190, 60),
            StatusKind::Error => Color32::from_rgb(235, 90, 90),
        };
        ui.label(RichText::new(&self.status.text).color(color).strong());
    }

    fn controls_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("controls_panel")
            .resizable(true)
            .default_width(380.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Choose a tokenizer");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        self.status_pill(ui);
                    });
                });
                ui.separator();

                ui.label("Hugging Face model");
                egui::ComboBox::from_id_salt("model_picker")
                    .selected_text(catalog::label_for(&self.model_id))
                    .width(ui.available_width())
                    .show_ui(ui, |ui| {
                        for model in MODELS {
                            ui.selectable_value(&mut self.model_id, model.id.to_owned(), model.label);
                        }
                    });

                ui.label("Optional HF access token (for gated models)");
                ui.add(
                    egui::TextEdit::singleline(&mut self.hf_token)
                        .password(true)
                        .hint_text("hf_xxx (kept in memory)")
                        .desired_width(f32::INFINITY),
                );

                ui.label("Prompt");
                egui::ScrollArea::vertical()
                    .max_height(240.0)
                    .id_salt("prompt_scroll_area")
                    .show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut self.prompt)
                                .hint_text("Type something interesting to see how it gets split...")
                                .desired_width(f32::INFINITY)
                                .desired_rows(5)
                                .frame(true),
                        );
                    });

                ui.horizontal(|ui| {
                    if ui.button("Visualize tokenization").clicked() {
                        self.tokenize();
                    }
                    if ui.button("Clear").clicked() {
                        self.clear_all();
                    }
                    if self.worker.is_busy() {
                        ui.spinner();
                    }
                });

                ui.separator();
                let (vocab, tokens, specials) = match &self.summary {
                    Some(s) => (
                        format_count(s.vocab_size),
                        format_count(Some(s.token_count)),
                        format_count(Some(s.special_count)),
                    ),
                    None => (
                        PLACEHOLDER.to_owned(),
                        PLACEHOLDER.to_owned(),
                        PLACEHOLDER.to_owned(),
                    ),
                };
                egui::Grid::new("summary_grid")
                    .num_columns(2)
                    .spacing([24.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Vocabulary size");
                        ui.strong(vocab);
                        ui.end_row();
                        ui.label("Tokens produced");
                        ui.strong(tokens);
                        ui.end_row();
                        ui.label("Special tokens");
                        ui.strong(specials);
                        ui.end_row();
                    });

                let cached = self.sessions.cached_models();
                if !cached.is_empty() {
                    ui.add_space(6.0);
                    ui.horizontal_wrapped(|ui| {
                        ui.label(RichText::new(format!("Loaded: {}", cached.join(", "))).small().weak());
                        if ui.small_button("Unload").clicked() {
                            self.unload_tokenizers();
                        }
                    });
                }
            });
    }

    fn visualization_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Token stream");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("Copy tokens").clicked() {
                        self.copy_tokens();
                    }
                });
            });
            ui.separator();

            egui::ScrollArea::vertical()
                .max_height(260.0)
                .id_salt("token_stream_scroll_area")
                .show(ui, |ui| {
                    if self.rows.is_empty() {
                        ui.label(
                            RichText::new("Run a prompt to see color-coded tokens appear here.").weak(),
                        );
                        return;
                    }
                    ui.horizontal_wrapped(|ui| {
                        ui.spacing_mut().item_spacing = egui::vec2(3.0, 3.0);
                        for row in &self.rows {
                            let mut chip = egui::Button::new(
                                RichText::new(&row.token).monospace().color(CHIP_TEXT),
                            )
                            .fill(token_color(&row.token));
                            if row.special {
                                chip = chip.stroke(egui::Stroke::new(2.0, Color32::WHITE));
                            }
                            ui.add(chip).on_hover_text(format!("id {}", row.id));
                        }
                    });
                });

            ui.separator();
            egui::ScrollArea::vertical()
                .id_salt("token_table_scroll_area")
                .show(ui, |ui| {
                    egui::Grid::new("token_table")
                        .num_columns(4)
                        .striped(true)
                        .spacing([18.0, 4.0])
                        .show(ui, |ui| {
                            ui.strong("#");
                            ui.strong("Token");
                            ui.strong("ID");
                            ui.strong("Type");
                            ui.end_row();
                            for (idx, row) in self.rows.iter().enumerate() {
                                ui.add(
                                    egui::Button::new(RichText::new(idx.to_string()).color(CHIP_TEXT))
                                        .fill(token_color(&row.token))
                                        .small(),
                                );
                                ui.code(row.token.as_str());
                                ui.label(row.id.to_string());
                                if row.special {
                                    ui.label(RichText::new("special").weak());
                                } else {
                                    ui.label("text");
                                }
                                ui.end_row();
                            }
                        });
                    if self.rows.is_empty() {
                        ui.label(RichText::new("No tokens yet.").weak());
                    }
                });
        });
    }
}

impl eframe::App for PlaygroundApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for update in self.worker.poll() {
            self.apply_update(update);
        }
        if self.worker.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        self.header_panel(ctx);

        self.footer_panel(ctx);

        self.controls_panel(ctx);

        self.visualization_panel(ctx);
    }
}

pub fn run(settings: Settings, sessions: Arc<SessionManager>) -> anyhow::Result<()> {
    let app = PlaygroundApp::new(sessions, &settings);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_title("Tokenizer playground"),
        ..Default::default()
    };
    eframe::run_native(
        "Tokenizer playground",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("failed to open window: {}", e))
}
