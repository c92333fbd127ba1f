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

//! Side panel with the port list and the route planner form.

use egui::{Color32, RichText};

use seaway_core::port::search_ports;
use seaway_core::selection::Selection;
use seaway_core::Port;

/// What the user asked for from the side panel
#[derive(Debug, Clone, PartialEq)]
pub enum RoutePanelAction {
    /// Same as clicking the port's marker
    PortClicked(Port),
    /// Plan a route by port names
    RouteRequested {
        origin_name: String,
        destination_name: String,
    },
    ClearSelection,
    /// Return the map to its starting view
    ResetView,
}

#[derive(Debug, Default)]
pub struct RoutePanel {
    search: String,
    origin_name: Option<String>,
    destination_name: Option<String>,
}

impl RoutePanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        ports: &[Port],
        selection: &Selection,
        ports_loading: bool,
    ) -> Option<RoutePanelAction> {
        let mut action = None;

        ui.label(RichText::new("◈ PORTS").color(Color32::from_rgb(100, 180, 220)).strong());
        ui.add_space(4.0);

        if ports_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading ports…");
            });
            return None;
        }

        ui.add(egui::TextEdit::singleline(&mut self.search).hint_text("Search name or continent"));

        egui::ScrollArea::vertical()
            .id_salt("port_list")
            .max_height(ui.available_height() * 0.5)
            .show(ui, |ui| {
                for port in search_ports(ports, &self.search) {
                    let selected = selection.origin().is_some_and(|o| o.is_same_port(port))
                        || selection.destination().is_some_and(|d| d.is_same_port(port));
                    let label = format!("{} · {}", port.name, port.continent);
                    let response = ui.add_enabled(
                        !port.is_disabled(),
                        egui::Button::selectable(selected, label),
                    );
                    if response.clicked() {
                        action = Some(RoutePanelAction::PortClicked(port.clone()));
                    }
                }
            });

        ui.separator();
        ui.label(RichText::new("◈ PLAN ROUTE").color(Color32::from_rgb(100, 180, 220)).strong());

        port_combo(ui, "route_origin", "From", &mut self.origin_name, ports);
        port_combo(ui, "route_destination", "To", &mut self.destination_name, ports);

        ui.horizontal(|ui| {
            let ready = self.origin_name.is_some()
                && self.destination_name.is_some()
                && self.origin_name != self.destination_name;
            if ui.add_enabled(ready, egui::Button::new("Calculate")).clicked() {
                if let (Some(origin_name), Some(destination_name)) =
                    (self.origin_name.clone(), self.destination_name.clone())
                {
                    action = Some(RoutePanelAction::RouteRequested {
                        origin_name,
                        destination_name,
                    });
                }
            }

            if ui.button("Clear").clicked() {
                self.origin_name = None;
                self.destination_name = None;
                action = Some(RoutePanelAction::ClearSelection);
            }

            if ui.button("Reset view").clicked() {
                action = Some(RoutePanelAction::ResetView);
            }
        });

        action
    }
}

fn port_combo(
    ui: &mut egui::Ui,
    id: &str,
    label: &str,
    value: &mut Option<String>,
    ports: &[Port],
) {
    ui.horizontal(|ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(value.as_deref().unwrap_or("Select port"))
            .show_ui(ui, |ui| {
                for port in ports.iter().filter(|p| !p.is_disabled()) {
                    ui.selectable_value(value, Some(port.name.clone()), &port.name);
                }
            });
    });
}
