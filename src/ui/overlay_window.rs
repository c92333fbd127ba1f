// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Floating prediction overlay.
//!
//! The window is an [`egui::Area`] whose position comes from the core
//! [`DragController`]; dragging the header moves it and keeps it inside the
//! viewport.

use egui::{Color32, RichText};

use seaway_core::drag::{DragController, Point, PointerSource, Rect, Size};
use seaway_core::overlay::{
    DelayDetails, HazardDetails, OverlayAction, OverlayTab, OverlayView, Pill, TabBody,
};

const OVERLAY_WIDTH: f32 = 320.0;
const INITIAL_HEIGHT: f32 = 220.0;

const TITLE_COLOR: Color32 = Color32::from_rgb(100, 180, 220);
const MUTED_COLOR: Color32 = Color32::from_rgb(160, 170, 180);
const ERROR_COLOR: Color32 = Color32::from_rgb(255, 110, 110);

fn class_color(class: &str) -> Color32 {
    match class {
        "bad" | "high" => Color32::from_rgb(235, 90, 90),
        "warn" | "medium" => Color32::from_rgb(240, 170, 60),
        _ => Color32::from_rgb(90, 200, 130),
    }
}

fn to_point(pos: egui::Pos2, viewport: egui::Rect) -> Point {
    Point::new(pos.x - viewport.min.x, pos.y - viewport.min.y)
}

/// Draggable overlay showing the delay prediction and hazard assessment.
#[derive(Debug)]
pub struct OverlayWindow {
    drag: DragController,
    /// Size measured on the previous frame
    size: egui::Vec2,
}

impl Default for OverlayWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayWindow {
    pub fn new() -> Self {
        Self {
            drag: DragController::default(),
            size: egui::vec2(OVERLAY_WIDTH, INITIAL_HEIGHT),
        }
    }

    /// Render the overlay and return what the user did with it.
    pub fn show(&mut self, ctx: &egui::Context, view: &OverlayView) -> Vec<OverlayAction> {
        let viewport = ctx.content_rect();
        let viewport_size = Size::new(viewport.width(), viewport.height());
        let size = Size::new(self.size.x, self.size.y);
        let top_left = self.drag.position(size, viewport_size);

        let mut actions = Vec::new();

        let area = egui::Area::new(egui::Id::new("prediction_overlay"))
            .order(egui::Order::Foreground)
            .fixed_pos(viewport.min + egui::vec2(top_left.x, top_left.y))
            .show(ctx, |ui| {
                egui::Frame::window(&ctx.style())
                    .fill(Color32::from_rgba_unmultiplied(25, 30, 35, 235))
                    .stroke(egui::Stroke::new(1.0, Color32::from_rgb(60, 80, 100)))
                    .corner_radius(6.0)
                    .show(ui, |ui| {
                        ui.set_width(OVERLAY_WIDTH);

                        let header = self.render_header(ui, view, &mut actions);
                        self.handle_drag(ctx, &header, viewport, Rect { min: top_left, size });

                        ui.horizontal(|ui| {
                            for (tab, label) in [(OverlayTab::Delay, "Delay"), (OverlayTab::Hazards, "Hazards")] {
                                if ui.selectable_label(view.tab == tab, label).clicked() && view.tab != tab {
                                    actions.push(OverlayAction::SelectTab(tab));
                                }
                            }
                        });

                        ui.label(format!("Origin: {}", view.origin));
                        ui.label(format!("Destination: {}", view.destination));

                        if !view.expanded {
                            return;
                        }

                        ui.separator();
                        match &view.body {
                            TabBody::Delay { loading, details, error } => {
                                render_delay(ui, *loading, details.as_ref(), *error, &mut actions);
                            }
                            TabBody::Hazards { loading, details, error } => {
                                render_hazards(ui, *loading, details.as_ref(), *error, &mut actions);
                            }
                        }
                    });
            });

        self.size = area.response.rect.size();
        actions
    }

    fn render_header(
        &self,
        ui: &mut egui::Ui,
        view: &OverlayView,
        actions: &mut Vec<OverlayAction>,
    ) -> egui::Response {
        let row = ui.horizontal(|ui| {
            ui.label(RichText::new("◈ AI · ROUTE").color(TITLE_COLOR).size(12.0).strong());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let collapse_icon = if view.expanded { "▲" } else { "▼" };
                if ui
                    .button(RichText::new(collapse_icon).size(10.0))
                    .on_hover_text(if view.expanded { "Hide details" } else { "Show details" })
                    .clicked()
                {
                    actions.push(OverlayAction::ToggleVisibility);
                }

                if view.pill != Pill::Empty {
                    ui.label(
                        RichText::new(view.pill.text())
                            .color(class_color(view.pill.class()))
                            .size(11.0),
                    );
                }
            });
        });

        // Title area doubles as the drag handle
        let title_rect = egui::Rect::from_min_size(
            row.response.rect.min,
            egui::vec2(row.response.rect.width() * 0.5, row.response.rect.height()),
        );
        ui.interact(title_rect, ui.id().with("overlay_drag"), egui::Sense::drag())
    }

    fn handle_drag(
        &mut self,
        ctx: &egui::Context,
        handle: &egui::Response,
        viewport: egui::Rect,
        element: Rect,
    ) {
        let viewport_size = Size::new(viewport.width(), viewport.height());

        if handle.drag_started() {
            let source = if ctx.input(|i| i.any_touches()) {
                PointerSource::Touch
            } else {
                PointerSource::Mouse
            };
            if let Some(pointer) = handle.interact_pointer_pos() {
                self.drag.begin_drag(source, to_point(pointer, viewport), element);
            }
        }

        let Some(source) = self.drag.drag_state().map(|d| d.source) else {
            return;
        };

        if handle.dragged() {
            if let Some(pointer) = handle.interact_pointer_pos() {
                self.drag
                    .update_drag(source, to_point(pointer, viewport), element.size, viewport_size);
            }
        }

        if handle.drag_stopped() {
            self.drag.end_drag(source);
        }
    }
}

fn render_delay(
    ui: &mut egui::Ui,
    loading: bool,
    details: Option<&DelayDetails>,
    error: Option<&'static str>,
    actions: &mut Vec<OverlayAction>,
) {
    if let Some(details) = details {
        ui.label(RichText::new(format!("Estimated delay: {} h", details.delay_hours)).strong());
        ui.label(format!("Delay probability: {}", details.probability));

        if let Some(factor) = &details.main_factor {
            ui.label(RichText::new(format!("Main cause: {factor}")).color(MUTED_COLOR));
        }
        if let Some(eta) = &details.planned_eta {
            ui.label(format!("Planned ETA: {eta}"));
        }
        if let Some(eta) = &details.adjusted_eta {
            ui.label(format!("Adjusted ETA: {eta}"));
        }
        if details.used_fallback {
            ui.label(
                RichText::new("⚠ Fallback prediction (incomplete data or model error)")
                    .color(MUTED_COLOR),
            );
        }
    }

    if !loading {
        if let Some(error) = error {
            ui.label(RichText::new(error).color(ERROR_COLOR));
        }
    }

    ui.add_space(4.0);
    if ui.button("Refresh").clicked() {
        actions.push(OverlayAction::RefreshDelay);
    }
}

fn render_hazards(
    ui: &mut egui::Ui,
    loading: bool,
    details: Option<&HazardDetails>,
    error: Option<&'static str>,
    actions: &mut Vec<OverlayAction>,
) {
    if loading {
        ui.label("Loading hazards…");
    } else if let Some(error) = error {
        ui.label(RichText::new(error).color(ERROR_COLOR));
    }

    if let Some(details) = details {
        ui.label(format!("Season: {}", details.season));
        ui.label(format!("Hemisphere: {}", details.hemisphere));
        ui.label(format!("Distance: {}", details.distance));
        ui.label(format!("Planned hours: {}", details.planned_hours));

        egui::ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
            for segment in &details.segments {
                ui.add_space(4.0);
                ui.label(RichText::new(format!("Segment {}", segment.number)).strong());
                ui.label(RichText::new(&segment.span).color(MUTED_COLOR).size(11.0));

                if let Some(advisory) = &segment.ice_advisory {
                    ui.label(RichText::new(format!("⚠ {advisory}")).color(ERROR_COLOR));
                }

                for hazard in &segment.hazards {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(
                            RichText::new(&hazard.kind)
                                .color(class_color(hazard.badge_class))
                                .strong(),
                        );
                        ui.label(RichText::new(&hazard.probability).color(MUTED_COLOR));
                        if let Some(region) = &hazard.region {
                            ui.label(RichText::new(format!("· {region}")).color(MUTED_COLOR));
                        }
                        if let Some(window) = &hazard.window {
                            ui.label(RichText::new(format!("· {window}")).color(MUTED_COLOR));
                        }
                    });
                    if let Some(rationale) = &hazard.rationale {
                        ui.label(RichText::new(rationale).size(11.0));
                    }
                }
            }
        });

        if let Some(message) = details.empty_message {
            ui.label(RichText::new(message).color(MUTED_COLOR));
        }
    }

    ui.add_space(4.0);
    if ui.button("Refresh hazards").clicked() {
        actions.push(OverlayAction::RefreshHazards);
    }
}
