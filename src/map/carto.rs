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

use serde::{Deserialize, Serialize};
use walkers::sources::{Attribution, TileSource};
use walkers::{HttpOptions, HttpTiles, TileId};

/// Carto basemap flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartoStyle {
    /// Coloured basemap with readable coastlines
    #[default]
    Voyager,
    /// Light grey basemap
    Positron,
}

impl CartoStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Voyager => "voyager",
            Self::Positron => "positron",
        }
    }

    fn url_path(self) -> &'static str {
        match self {
            Self::Voyager => "rastertiles/voyager",
            Self::Positron => "light_all",
        }
    }
}

/// Tile source for Carto CDN basemap tiles
/// Uses subdomain load balancing across a-d.basemaps.cartocdn.com
#[derive(Debug, Clone, Copy, Default)]
pub struct CartoTileSource {
    style: CartoStyle,
}

impl CartoTileSource {
    pub fn new(style: CartoStyle) -> Self {
        Self { style }
    }
}

impl TileSource for CartoTileSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        let subdomain = ['a', 'b', 'c', 'd'][((tile_id.x + tile_id.y) % 4) as usize];

        format!(
            "https://{}.basemaps.cartocdn.com/{}/{}/{}/{}.png",
            subdomain,
            self.style.url_path(),
            tile_id.zoom,
            tile_id.x,
            tile_id.y
        )
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: "© OpenStreetMap contributors, © CARTO",
            url: "https://carto.com/attributions",
            logo_light: None,
            logo_dark: None,
        }
    }
}

/// HTTP tiles for `style` with an on-disk cache under the user cache dir
pub fn carto_tiles(style: CartoStyle, ctx: &egui::Context) -> HttpTiles {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(|| std::path::PathBuf::from(".cache"))
        .join("seaway-desktop")
        .join("tiles")
        .join(style.as_str());

    let http_options = HttpOptions {
        cache: Some(cache_dir),
        ..Default::default()
    };

    HttpTiles::with_options(CartoTileSource::new(style), http_options, ctx.clone())
}
