use crate::app::ConvertFlowApp;
use crate::constants::{APP_NAME, DOWNLOAD_LABEL, REPAINT_INTERVAL_MS};
use crate::errors::Severity;
use crate::panels::{DownloadState, ResultStyle};
use eframe::egui;

/// Clicks collected while drawing, applied once the frame is laid out.
enum UiCommand {
    PickFile,
    Submit,
    Action(&'static str),
    SubAction(&'static str),
    DismissBanner(Severity),
    OpenDownload,
    SaveDownload,
}

impl eframe::App for ConvertFlowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_events();

        let mut style = (*ctx.style()).clone();
        style.spacing.button_padding = egui::vec2(12.0, 8.0);
        style.spacing.item_spacing = egui::vec2(10.0, 10.0);
        style.visuals.dark_mode = true;
        style.visuals.panel_fill = egui::Color32::from_gray(25);
        ctx.set_style(style);

        let mut commands = Vec::new();
        let mut menu_rects = Vec::new();

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::none().fill(egui::Color32::from_gray(15)).inner_margin(15.0))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(egui::RichText::new(APP_NAME).size(26.0).color(egui::Color32::WHITE).strong());
                    ui.label(
                        egui::RichText::new(format!("Server: {}", self.config.server_url()))
                            .size(13.0)
                            .color(egui::Color32::from_rgb(150, 150, 150)),
                    );
                    ui.label(
                        egui::RichText::new(self.workspace.phase.status_text())
                            .size(12.0)
                            .color(egui::Color32::from_rgb(120, 120, 120)),
                    );
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.show_upload_form(ui, &mut commands);
                self.show_banners(ui, &mut commands);
                self.show_summary(ui);
                if let Some(rect) = self.show_action_panel(ui, &mut commands) {
                    menu_rects.push(rect);
                }
                if let Some(rect) = self.show_sub_menu(ui, &mut commands) {
                    menu_rects.push(rect);
                }
                self.show_result(ui, &mut commands);
            });
        });

        let pressed_outside = ctx.input(|i| {
            i.pointer.any_pressed()
                && i
                    .pointer
                    .interact_pos()
                    .map(|pos| !menu_rects.iter().any(|rect: &egui::Rect| rect.contains(pos)))
                    .unwrap_or(false)
        });
        if pressed_outside {
            self.workspace.outside_interaction();
        }

        for command in commands {
            self.apply(command);
        }

        if self.workspace.phase.is_busy() || self.is_downloading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(REPAINT_INTERVAL_MS));
        }
    }
}

impl ConvertFlowApp {
    fn apply(&mut self, command: UiCommand) {
        match command {
            UiCommand::PickFile => self.pick_file(),
            UiCommand::Submit => self.submit_upload(),
            UiCommand::Action(id) => self.select_action(id),
            UiCommand::SubAction(id) => self.select_sub_action(id),
            UiCommand::DismissBanner(severity) => {
                self.workspace.panels.notifications.dismiss(severity)
            }
            UiCommand::OpenDownload => self.open_download(),
            UiCommand::SaveDownload => self.save_download(),
        }
    }

    fn show_upload_form(&self, ui: &mut egui::Ui, commands: &mut Vec<UiCommand>) {
        card(ui, |ui| {
            ui.heading(egui::RichText::new("📁 Upload").color(egui::Color32::WHITE).size(18.0));
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let submit = &self.workspace.panels.submit;
                if ui.add_enabled(submit.is_enabled(), egui::Button::new("Choose file…")).clicked() {
                    commands.push(UiCommand::PickFile);
                }

                let selected = self
                    .selected_file
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "No file chosen".to_string());
                ui.label(egui::RichText::new(selected).color(egui::Color32::LIGHT_GRAY));
            });

            let submit = &self.workspace.panels.submit;
            let button = egui::Button::new(egui::RichText::new(submit.label()).color(egui::Color32::WHITE).strong())
                .fill(egui::Color32::from_rgb(76, 175, 80));
            if ui.add_enabled(submit.is_enabled(), button).clicked() {
                commands.push(UiCommand::Submit);
            }
        });
    }

    fn show_banners(&mut self, ui: &mut egui::Ui, commands: &mut Vec<UiCommand>) {
        for banner in self.workspace.panels.notifications.banners_mut() {
            let (fill, title) = match banner.severity {
                Severity::Error => (egui::Color32::from_rgb(120, 30, 30), "Error:"),
                Severity::Warning => (egui::Color32::from_rgb(130, 95, 10), "Warning:"),
            };

            let response = egui::Frame::none()
                .fill(fill)
                .rounding(8.0)
                .inner_margin(12.0)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(title).strong().color(egui::Color32::WHITE));
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("✕").clicked() {
                                commands.push(UiCommand::DismissBanner(banner.severity));
                            }
                        });
                    });
                    if let Some(details) = &banner.details {
                        ui.label(
                            egui::RichText::new(format!("Details: {}", details))
                                .small()
                                .color(egui::Color32::from_gray(220)),
                        );
                    }
                })
                .response;

            if banner.scroll_pending {
                response.scroll_to_me(Some(egui::Align::Center));
                banner.scroll_pending = false;
            }
            ui.add_space(6.0);
        }
    }

    fn show_summary(&self, ui: &mut egui::Ui) {
        let panel = &self.workspace.panels.summary;
        let Some(summary) = panel.summary().filter(|_| panel.is_visible()) else {
            return;
        };

        card(ui, |ui| {
            ui.heading(egui::RichText::new("📄 File").color(egui::Color32::WHITE).size(18.0));
            ui.add_space(8.0);
            egui::Grid::new("file_summary")
                .num_columns(2)
                .spacing([20.0, 6.0])
                .show(ui, |ui| {
                    for (label, value) in summary.display_rows() {
                        ui.label(egui::RichText::new(label).strong());
                        ui.label(value);
                        ui.end_row();
                    }
                });
        });
    }

    fn show_action_panel(
        &self,
        ui: &mut egui::Ui,
        commands: &mut Vec<UiCommand>,
    ) -> Option<egui::Rect> {
        let panel = &self.workspace.panels.actions;
        if panel.is_empty() {
            return None;
        }
        let actions = panel.actions();

        let enabled = !self.workspace.is_process_locked();
        let response = card(ui, |ui| {
            ui.heading(egui::RichText::new("⚙ Actions").color(egui::Color32::WHITE).size(18.0));
            ui.add_space(8.0);
            ui.horizontal_wrapped(|ui| {
                for action in actions {
                    let label = if action.is_compound() {
                        format!("{} ▾", action.label)
                    } else {
                        action.label.to_string()
                    };
                    let button = egui::Button::new(egui::RichText::new(label).color(egui::Color32::WHITE))
                        .fill(color_from_hex(action.color_hint));
                    if ui.add_enabled(enabled, button).clicked() {
                        commands.push(UiCommand::Action(action.id));
                    }
                }
            });
        });

        Some(response.rect)
    }

    fn show_sub_menu(&self, ui: &mut egui::Ui, commands: &mut Vec<UiCommand>) -> Option<egui::Rect> {
        let menu = self.workspace.panels.sub_menu.as_ref()?;
        let enabled = !self.workspace.is_process_locked();

        let response = egui::Frame::none()
            .fill(egui::Color32::from_gray(40))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_gray(70)))
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                if let Some(parent) = crate::actions::find(menu.parent_id()) {
                    ui.label(egui::RichText::new(parent.label).strong());
                    ui.add_space(4.0);
                }
                ui.horizontal_wrapped(|ui| {
                    for option in menu.options() {
                        let button = egui::Button::new(egui::RichText::new(option.label).color(egui::Color32::WHITE))
                            .fill(color_from_hex(option.color_hint));
                        if ui.add_enabled(enabled, button).clicked() {
                            commands.push(UiCommand::SubAction(option.id));
                        }
                    }
                });
            })
            .response;
        ui.add_space(10.0);

        Some(response.rect)
    }

    fn show_result(&self, ui: &mut egui::Ui, commands: &mut Vec<UiCommand>) {
        let result = &self.workspace.panels.result;
        let Some(style) = result.style() else {
            return;
        };
        let color = style_color(style);

        egui::Frame::none()
            .fill(egui::Color32::from_gray(30))
            .stroke(egui::Stroke::new(2.0, color))
            .rounding(10.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.label(egui::RichText::new(result.message()).color(color).size(15.0));
                if let Some(details) = result.details() {
                    ui.label(egui::RichText::new(details).small().color(egui::Color32::LIGHT_GRAY));
                }

                if result.download_url().is_some() {
                    ui.add_space(6.0);
                    match result.download() {
                        DownloadState::Idle => {
                            ui.horizontal(|ui| {
                                if ui.link(DOWNLOAD_LABEL).clicked() {
                                    commands.push(UiCommand::OpenDownload);
                                }
                                if ui.button("Save as…").clicked() {
                                    commands.push(UiCommand::SaveDownload);
                                }
                            });
                        }
                        DownloadState::InProgress { percentage, .. } => {
                            ui.add(
                                egui::ProgressBar::new(percentage / 100.0)
                                    .show_percentage()
                                    .desired_width(280.0),
                            );
                        }
                        DownloadState::Saved(path) => {
                            ui.label(format!("Saved to {}", path.display()));
                        }
                    }
                }
            });
    }
}

fn card<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> egui::Response {
    let response = egui::Frame::none()
        .fill(egui::Color32::from_gray(30))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_gray(45)))
        .rounding(10.0)
        .inner_margin(20.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui)
        })
        .response;
    ui.add_space(15.0);
    response
}

fn style_color(style: ResultStyle) -> egui::Color32 {
    match style {
        ResultStyle::Processing => egui::Color32::from_rgb(100, 160, 255),
        ResultStyle::Success => egui::Color32::from_rgb(100, 200, 100),
        ResultStyle::Warning => egui::Color32::from_rgb(255, 180, 60),
        ResultStyle::Error => egui::Color32::from_rgb(255, 100, 100),
    }
}

/// `#RRGGBB` to a colour; malformed channels fall back to mid grey.
fn color_from_hex(hex: &str) -> egui::Color32 {
    let hex = hex.trim_start_matches('#');
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .unwrap_or(128)
    };
    egui::Color32::from_rgb(channel(0), channel(2), channel(4))
}
