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

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod app;
mod cli;
mod config;
mod map;
mod ui;

use clap::Parser;
use eframe::egui;
use log::info;

use app::SeawayApp;
use cli::Cli;
use config::ConfigStore;

fn init_logging(filter: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filter) = filter {
        builder.parse_filters(filter);
    }
    builder.init();
}

fn main() -> Result<(), eframe::Error> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    info!("Starting Seaway Desktop...");

    let config = ConfigStore::load(&cli.overrides());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_title("Seaway Desktop"),
        ..Default::default()
    };

    eframe::run_native(
        "Seaway Desktop",
        options,
        Box::new(move |cc| Ok(Box::new(SeawayApp::new(cc, config)?))),
    )
}
