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

//! Application configuration management.
//!
//! Settings are persisted as TOML through confy. Every field has a serde
//! default so older or hand-edited files keep loading.

use std::path::PathBuf;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use seaway_core::http::endpoints::{
    DEFAULT_API_BASE, DEFAULT_HAZARD_ASSESSMENT_PATH, DEFAULT_PREDICT_DELAY_PATH,
};
use seaway_core::http::Endpoints;
use seaway_core::prediction::PredictionParams;

use crate::map::carto::CartoStyle;

const APP_NAME: &str = "seaway-desktop";
const CONFIG_NAME: &str = "config";

/// Environment variable holding the backend token. Takes precedence over the config file.
pub const API_TOKEN_ENV: &str = "SEAWAY_API_TOKEN";

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the route planning backend
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_predict_delay_path")]
    pub predict_delay_path: String,

    #[serde(default = "default_hazard_assessment_path")]
    pub hazard_assessment_path: String,

    /// Bearer token (optional, env var takes precedence)
    #[serde(default)]
    pub api_token: Option<String>,

    #[serde(default = "default_cruise_speed_knots")]
    pub default_cruise_speed_knots: f64,

    #[serde(default = "default_avg_wind_knots")]
    pub avg_wind_knots: f64,

    #[serde(default = "default_max_wave_m")]
    pub max_wave_m: f64,

    /// Basemap style: "voyager" or "positron"
    #[serde(default)]
    pub basemap: CartoStyle,

    /// Initial map zoom level
    #[serde(default = "default_zoom")]
    pub default_zoom: f64,

    /// Prediction overlay expanded state
    #[serde(default = "default_true")]
    pub overlay_expanded: bool,
}

// Default value functions for serde
fn default_api_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_predict_delay_path() -> String {
    DEFAULT_PREDICT_DELAY_PATH.to_string()
}

fn default_hazard_assessment_path() -> String {
    DEFAULT_HAZARD_ASSESSMENT_PATH.to_string()
}

fn default_cruise_speed_knots() -> f64 {
    18.0
}

fn default_avg_wind_knots() -> f64 {
    12.0
}

fn default_max_wave_m() -> f64 {
    2.0
}

fn default_zoom() -> f64 {
    3.0
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            predict_delay_path: default_predict_delay_path(),
            hazard_assessment_path: default_hazard_assessment_path(),
            api_token: None,
            default_cruise_speed_knots: default_cruise_speed_knots(),
            avg_wind_knots: default_avg_wind_knots(),
            max_wave_m: default_max_wave_m(),
            basemap: CartoStyle::default(),
            default_zoom: default_zoom(),
            overlay_expanded: true,
        }
    }
}

impl AppConfig {
    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(self.api_base_url.clone())
            .with_predict_delay_path(self.predict_delay_path.clone())
            .with_hazard_assessment_path(self.hazard_assessment_path.clone())
    }

    pub fn prediction_params(&self) -> PredictionParams {
        PredictionParams {
            cruise_speed_knots: self.default_cruise_speed_knots,
            distance_nm: None,
            avg_wind_knots: self.avg_wind_knots,
            max_wave_m: self.max_wave_m,
        }
    }

    /// Resolve the API token from the environment or the config file
    pub fn resolve_api_token(&self) -> Option<String> {
        resolve_token(std::env::var(API_TOKEN_ENV).ok(), self.api_token.as_deref())
    }

    /// Where the token came from, for display
    pub fn api_token_source(&self) -> Option<&'static str> {
        if std::env::var(API_TOKEN_ENV).map(|k| !k.is_empty()).unwrap_or(false) {
            Some("environment variable")
        } else if self.api_token.as_deref().is_some_and(|t| !t.is_empty()) {
            Some("config file")
        } else {
            None
        }
    }
}

/// Session-only settings from the command line. Never written back to disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionOverrides {
    pub api_base_url: Option<String>,
    pub cruise_speed_knots: Option<f64>,
}

impl SessionOverrides {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(api_base) = &self.api_base_url {
            config.api_base_url.clone_from(api_base);
        }
        if let Some(speed) = self.cruise_speed_knots.filter(|s| s.is_finite() && *s > 0.0) {
            config.default_cruise_speed_knots = speed;
        }
    }
}

/// The config file as read from disk and the settings in effect for this session.
///
/// Only UI preferences are written back, onto the on-disk copy. A file that
/// failed to load is left untouched.
#[derive(Debug)]
pub struct ConfigStore {
    path: Option<PathBuf>,
    persisted: Option<AppConfig>,
    effective: AppConfig,
}

impl ConfigStore {
    /// Load the user's config file and layer the session overrides on top
    pub fn load(overrides: &SessionOverrides) -> Self {
        match AppConfig::get_config_path() {
            Ok(path) => {
                info!("Config file: {}", path.display());
                Self::load_from(path, overrides)
            }
            Err(e) => {
                warn!("Failed to locate config file, using defaults: {e}");
                Self::detached(AppConfig::default(), overrides)
            }
        }
    }

    pub fn load_from(path: PathBuf, overrides: &SessionOverrides) -> Self {
        match confy::load_path::<AppConfig>(&path) {
            Ok(persisted) => {
                let mut effective = persisted.clone();
                overrides.apply(&mut effective);
                Self {
                    path: Some(path),
                    persisted: Some(persisted),
                    effective,
                }
            }
            Err(e) => {
                warn!("Failed to load config, using defaults: {e}");
                Self::detached(AppConfig::default(), overrides)
            }
        }
    }

    fn detached(mut effective: AppConfig, overrides: &SessionOverrides) -> Self {
        overrides.apply(&mut effective);
        Self {
            path: None,
            persisted: None,
            effective,
        }
    }

    /// Settings in effect for this session
    pub fn effective(&self) -> &AppConfig {
        &self.effective
    }

    /// Remember the overlay state and save it. Returns `false` when there is
    /// no loaded file to write to.
    pub fn set_overlay_expanded(&mut self, expanded: bool) -> Result<bool, confy::ConfyError> {
        self.effective.overlay_expanded = expanded;
        let (Some(path), Some(persisted)) = (&self.path, &mut self.persisted) else {
            debug!("Config was not loaded from disk; not saving");
            return Ok(false);
        };
        persisted.overlay_expanded = expanded;
        confy::store_path(path, &*persisted)?;
        Ok(true)
    }
}

fn resolve_token(env_token: Option<String>, config_token: Option<&str>) -> Option<String> {
    // Check environment variable first
    if let Some(token) = env_token.filter(|t| !t.is_empty()) {
        return Some(token);
    }

    // Fall back to config
    config_token.map(str::to_string).filter(|t| !t.is_empty())
}
