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

//! Top-level application state and frame loop.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::{broadcast, oneshot};

use seaway_core::events::drain;
use seaway_core::http::HttpPredictionClient;
use seaway_core::overlay::{OverlayAction, OverlayState, OverlayView};
use seaway_core::{AppEvent, EventBus, Port, PredictionOrchestrator, RoutePlanner};

use crate::config::ConfigStore;
use crate::map::view::RouteId;
use crate::map::MapView;
use crate::ui::{OverlayWindow, RoutePanel, RoutePanelAction};

pub type DynError = Box<dyn std::error::Error + Send + Sync>;

pub struct SeawayApp {
    ctx: egui::Context,
    config: ConfigStore,
    // Owns the network worker threads; dropped with the app
    _runtime: tokio::runtime::Runtime,
    events: EventBus,
    event_rx: broadcast::Receiver<AppEvent>,
    ports: Vec<Port>,
    ports_rx: Option<oneshot::Receiver<Vec<Port>>>,
    planner: RoutePlanner<RouteId>,
    map: MapView,
    overlay_state: OverlayState,
    overlay_window: OverlayWindow,
    route_panel: RoutePanel,
    session_expired: bool,
}

impl std::fmt::Debug for SeawayApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeawayApp")
            .field("ports", &self.ports.len())
            .field("planner", &self.planner)
            .finish_non_exhaustive()
    }
}

impl SeawayApp {
    pub fn new(cc: &eframe::CreationContext<'_>, store: ConfigStore) -> Result<Self, DynError> {
        info!("Initializing Seaway app...");
        let config = store.effective();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("seaway-net")
            .enable_all()
            .build()?;

        let events = EventBus::new();
        let event_rx = events.subscribe();

        match config.api_token_source() {
            Some(source) => info!("Using API token from {source}"),
            None => info!("No API token configured"),
        }
        let client =
            HttpPredictionClient::new(config.endpoints())?.with_token(config.resolve_api_token());
        info!("Prediction backend: {}", config.api_base_url);

        let repaint_ctx = cc.egui_ctx.clone();
        let orchestrator =
            PredictionOrchestrator::new(Arc::new(client.clone()), runtime.handle().clone())
                .with_events(events.clone())
                .with_waker(move || repaint_ctx.request_repaint());

        let (ports_tx, ports_rx) = oneshot::channel();
        let catalog_events = events.clone();
        let catalog_ctx = cc.egui_ctx.clone();
        runtime.spawn(async move {
            let ports = client.ports_or_fallback(Some(&catalog_events)).await;
            if ports_tx.send(ports).is_err() {
                debug!("App closed before the port catalog arrived");
            }
            catalog_ctx.request_repaint();
        });

        Ok(Self {
            ctx: cc.egui_ctx.clone(),
            planner: RoutePlanner::new(orchestrator, events.clone(), config.prediction_params()),
            map: MapView::new(&cc.egui_ctx, config.basemap, config.default_zoom),
            overlay_state: OverlayState::new(config.overlay_expanded),
            config: store,
            _runtime: runtime,
            events,
            event_rx,
            ports: Vec::new(),
            ports_rx: Some(ports_rx),
            overlay_window: OverlayWindow::new(),
            route_panel: RoutePanel::new(),
            session_expired: false,
        })
    }

    fn poll_ports(&mut self) {
        let Some(rx) = self.ports_rx.as_mut() else {
            return;
        };
        match rx.try_recv() {
            Ok(ports) => {
                info!("Port catalog ready ({} ports)", ports.len());
                self.ports = ports;
                self.ports_rx = None;
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
            Err(oneshot::error::TryRecvError::Closed) => {
                warn!("Port catalog task ended without a result");
                self.ports = seaway_core::port::fallback_ports();
                self.ports_rx = None;
            }
        }
    }

    fn poll_events(&mut self) {
        for event in drain(&mut self.event_rx) {
            match event {
                AppEvent::RouteCalculated {
                    origin_name,
                    destination_name,
                } => {
                    self.planner.route_calculated(
                        &origin_name,
                        &destination_name,
                        &self.ports,
                        &mut self.map,
                    );
                }
                AppEvent::SessionExpired => {
                    if !self.session_expired {
                        warn!("Backend rejected the API token; session expired");
                    }
                    self.session_expired = true;
                }
                // Published by this app for other listeners
                AppEvent::PairSelected(_) | AppEvent::SelectionCleared => {}
            }
        }
    }

    fn handle_panel_action(&mut self, action: RoutePanelAction) {
        match action {
            RoutePanelAction::PortClicked(port) => {
                self.planner.click(&port, &mut self.map);
            }
            RoutePanelAction::RouteRequested {
                origin_name,
                destination_name,
            } => {
                // Goes through the bus like a route calculated by any other widget
                self.events.publish(AppEvent::RouteCalculated {
                    origin_name,
                    destination_name,
                });
                self.ctx.request_repaint();
            }
            RoutePanelAction::ClearSelection => {
                self.planner.clear(&mut self.map);
            }
            RoutePanelAction::ResetView => self.map.reset_view(),
        }
    }

    fn handle_overlay_action(&mut self, action: OverlayAction) {
        if let Some(kind) = self.overlay_state.handle(action) {
            self.planner.refresh(kind);
        }

        if action == OverlayAction::ToggleVisibility {
            if let Err(e) = self.config.set_overlay_expanded(self.overlay_state.is_expanded()) {
                warn!("Failed to save config: {e}");
            }
        }
    }
}

impl eframe::App for SeawayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_ports();
        self.poll_events();
        self.planner.orchestrator_mut().poll_completions();

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.planner.clear(&mut self.map);
        }

        egui::SidePanel::left("route_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                let action = self.route_panel.show(
                    ui,
                    &self.ports,
                    self.planner.selection(),
                    self.ports_rx.is_some(),
                );
                if let Some(action) = action {
                    self.handle_panel_action(action);
                }

                if self.session_expired {
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new("Session expired. Sign in again to refresh predictions.")
                            .color(egui::Color32::from_rgb(255, 110, 110)),
                    );
                }
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if let Some(port) = self.map.show(ui, &self.ports, self.planner.selection()) {
                    self.planner.click(&port, &mut self.map);
                }
            });

        let view = OverlayView::compose(
            self.planner.selection(),
            self.planner.orchestrator().delay(),
            self.planner.orchestrator().hazard(),
            &self.overlay_state,
            &chrono::Local,
        );
        if let Some(view) = view {
            for action in self.overlay_window.show(ctx, &view) {
                self.handle_overlay_action(action);
            }
        }
    }
}
