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

//! Backend endpoint layout.

use std::borrow::Cow;

/// Base URL used when nothing is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// Default path of the delay prediction endpoint.
pub const DEFAULT_PREDICT_DELAY_PATH: &str = "/api/ai/predict-weather-delay";

/// Default path of the hazard assessment endpoint.
pub const DEFAULT_HAZARD_ASSESSMENT_PATH: &str = "/ai/hazard-assessment";

/// Path of the port catalog.
pub const PORTS_PATH: &str = "/ports/all-ports";

/// Join `path` onto `base`.
///
/// Trailing slashes are stripped from the base and the path always gets a
/// leading `/`. A base ending in `/api` combined with a path starting with
/// `/api/` collapses to a single `/api` segment.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path: Cow<'_, str> = if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{path}"))
    };

    match path.strip_prefix("/api") {
        Some(rest) if base.ends_with("/api") && rest.starts_with('/') => format!("{base}{rest}"),
        _ => format!("{base}{path}"),
    }
}

/// Where the backend lives and the paths of each endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_base: String,
    pub predict_delay_path: String,
    pub hazard_assessment_path: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl Endpoints {
    /// Endpoints rooted at `api_base` with the default paths.
    #[must_use]
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            predict_delay_path: DEFAULT_PREDICT_DELAY_PATH.to_string(),
            hazard_assessment_path: DEFAULT_HAZARD_ASSESSMENT_PATH.to_string(),
        }
    }

    #[must_use]
    pub fn with_predict_delay_path(mut self, path: impl Into<String>) -> Self {
        self.predict_delay_path = path.into();
        self
    }

    #[must_use]
    pub fn with_hazard_assessment_path(mut self, path: impl Into<String>) -> Self {
        self.hazard_assessment_path = path.into();
        self
    }

    #[must_use]
    pub fn delay_url(&self) -> String {
        join_url(&self.api_base, &self.predict_delay_path)
    }

    #[must_use]
    pub fn hazard_url(&self) -> String {
        join_url(&self.api_base, &self.hazard_assessment_path)
    }

    #[must_use]
    pub fn ports_url(&self) -> String {
        join_url(&self.api_base, PORTS_PATH)
    }
}
