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

//! Command line overrides.

use clap::Parser;

use crate::config::SessionOverrides;

/// Maritime route planner with delay and hazard predictions
#[derive(Debug, Parser)]
#[command(name = "seaway-desktop", version, about)]
pub struct Cli {
    /// Backend base URL for this session (overrides the config file)
    #[arg(long)]
    pub api_base: Option<String>,

    /// Cruise speed in knots used for predictions
    #[arg(long)]
    pub cruise_speed: Option<f64>,

    /// Log filter, e.g. `debug` or `seaway_core=debug,info`
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Session overrides for the loaded config.
    pub fn overrides(&self) -> SessionOverrides {
        SessionOverrides {
            api_base_url: self.api_base.clone(),
            cruise_speed_knots: self.cruise_speed,
        }
    }
}
