//! Desktop window for the unlocker, built on egui.

use crate::{FilePicker, FormController, FormState, NoticeLevel, UnlockConfig, UnlockWorker};
use eframe::egui;
use rfd::FileDialog;
use std::path::PathBuf;

const WINDOW_TITLE: &str = "PDF Password Unlocker";
const ACCENT: egui::Color32 = egui::Color32::from_rgb(0x4C, 0xAF, 0x50);
const FIELD_WIDTH: f32 = 440.0;

/// Open the window and run until it is closed.
pub fn run() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([600.0, 400.0])
            .with_resizable(false)
            .with_title(WINDOW_TITLE),
        centered: true,
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|cc| Ok(Box::new(UnlockerApp::new(cc)))),
    )
}

// ── NativePicker ─────────────────────────────────────────────────────────────

/// Native open/save dialogs filtered to PDF files.
pub struct NativePicker;

impl FilePicker for NativePicker {
    fn pick_input(&self) -> Option<PathBuf> {
        FileDialog::new()
            .add_filter("PDF files", &["pdf"])
            .set_title("Select encrypted PDF")
            .pick_file()
    }

    fn pick_output(&self) -> Option<PathBuf> {
        FileDialog::new()
            .add_filter("PDF files", &["pdf"])
            .set_title("Save unlocked PDF as...")
            .save_file()
    }
}

// ── UnlockerApp ──────────────────────────────────────────────────────────────

enum FormAction {
    BrowseInput,
    BrowseOutput,
    Submit,
    DismissNotice,
}

pub struct UnlockerApp {
    controller: FormController,
    picker: NativePicker,
}

impl UnlockerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let ctx = cc.egui_ctx.clone();
        let worker =
            UnlockWorker::new(UnlockConfig::default()).with_waker(move || ctx.request_repaint());
        Self {
            controller: FormController::new(worker),
            picker: NativePicker,
        }
    }

    fn handle(&mut self, action: FormAction) {
        match action {
            FormAction::BrowseInput => {
                self.controller.select_input(&self.picker);
            }
            FormAction::BrowseOutput => {
                self.controller.select_output(&self.picker);
            }
            FormAction::Submit => {
                // Failures are already reflected in the form state.
                let _ = self.controller.submit();
            }
            FormAction::DismissNotice => self.controller.dismiss_notice(),
        }
    }
}

impl eframe::App for UnlockerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.poll();

        let mut actions = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            draw_form(ui, self.controller.state_mut(), &mut actions);
        });
        draw_notice(ctx, self.controller.state(), &mut actions);

        for action in actions {
            self.handle(action);
        }
    }
}

// ── Drawing ──────────────────────────────────────────────────────────────────

fn draw_form(ui: &mut egui::Ui, state: &mut FormState, actions: &mut Vec<FormAction>) {
    let modal_open = state.notice.is_some();

    ui.add_enabled_ui(!modal_open, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(6.0);

            ui.label(egui::RichText::new("Input PDF:").strong());
            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(&mut state.input_path).desired_width(FIELD_WIDTH));
                if ui.button("Browse").clicked() {
                    actions.push(FormAction::BrowseInput);
                }
            });

            ui.add_space(6.0);
            ui.label(egui::RichText::new("Output PDF:").strong());
            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(&mut state.output_path).desired_width(FIELD_WIDTH));
                if ui.button("Browse").clicked() {
                    actions.push(FormAction::BrowseOutput);
                }
            });

            ui.add_space(6.0);
            ui.label(egui::RichText::new("Password:").strong());
            ui.add(
                egui::TextEdit::singleline(&mut state.password)
                    .password(true)
                    .desired_width(FIELD_WIDTH),
            );

            ui.add_space(12.0);
            let unlock = egui::Button::new(
                egui::RichText::new("Unlock PDF")
                    .strong()
                    .size(15.0)
                    .color(egui::Color32::WHITE),
            )
            .fill(ACCENT)
            .min_size(egui::vec2(150.0, 38.0));
            if ui.add(unlock).clicked() {
                actions.push(FormAction::Submit);
            }

            ui.add_space(12.0);
            draw_status(ui, state);
        });
    });
}

fn draw_status(ui: &mut egui::Ui, state: &FormState) {
    let text = state.status_line();
    if state.is_busy() {
        ui.horizontal(|ui| {
            ui.add(egui::Spinner::new());
            ui.label(text);
        });
        return;
    }

    if state.status.is_error() {
        ui.colored_label(ui.visuals().error_fg_color, text);
    } else {
        ui.label(text);
    }
}

fn draw_notice(ctx: &egui::Context, state: &FormState, actions: &mut Vec<FormAction>) {
    let Some(notice) = &state.notice else {
        return;
    };

    egui::Window::new(notice.title.as_str())
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            match notice.level {
                NoticeLevel::Info => ui.label(notice.message.as_str()),
                NoticeLevel::Error => {
                    ui.colored_label(ui.visuals().error_fg_color, notice.message.as_str())
                }
            };
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("OK").clicked() {
                    actions.push(FormAction::DismissNotice);
                }
            });
        });
}
