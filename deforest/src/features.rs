// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! The input schema of a single land tile.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::frame::{Frame, Value};
use crate::errors::FrameError;

pub const REGION_COLUMN: &str = "Region";
pub const COUNTRY_COLUMN: &str = "Country";

/// The categorical columns that are one-hot encoded before scaling.
pub const CATEGORICAL_COLUMNS: [&str; 2] = [REGION_COLUMN, COUNTRY_COLUMN];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Amazon,
    #[serde(rename = "Congo Basin")]
    CongoBasin,
    #[serde(rename = "SE Asia")]
    SeAsia,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Amazon, Region::CongoBasin, Region::SeAsia];

    pub fn as_str(self) -> &'static str {
        match self {
            Region::Amazon => "Amazon",
            Region::CongoBasin => "Congo Basin",
            Region::SeAsia => "SE Asia",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    Brazil,
    Colombia,
    Peru,
    Congo,
    #[serde(rename = "DRC")]
    Drc,
    Gabon,
    Indonesia,
    Malaysia,
    #[serde(rename = "Papua New Guinea")]
    PapuaNewGuinea,
}

impl Country {
    pub const ALL: [Country; 9] = [
        Country::Brazil,
        Country::Colombia,
        Country::Peru,
        Country::Congo,
        Country::Drc,
        Country::Gabon,
        Country::Indonesia,
        Country::Malaysia,
        Country::PapuaNewGuinea,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Country::Brazil => "Brazil",
            Country::Colombia => "Colombia",
            Country::Peru => "Peru",
            Country::Congo => "Congo",
            Country::Drc => "DRC",
            Country::Gabon => "Gabon",
            Country::Indonesia => "Indonesia",
            Country::Malaysia => "Malaysia",
            Country::PapuaNewGuinea => "Papua New Guinea",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The numeric inputs of a tile, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericFeature {
    Latitude,
    Longitude,
    Elevation,
    Slope,
    Rainfall,
    Temperature,
    CloudCover,
    FireAlerts,
    Ndvi,
    Ndmi,
    Evi,
    TreeCover,
    CanopyHeight,
    DistanceToRoad,
    DistanceToSettlement,
    DistanceToRiver,
    ProtectedArea,
    LoggingConcession,
    PopulationDensity,
    ForestLossLast3Y,
    CumulativeDeforested,
}

impl NumericFeature {
    pub const ALL: [NumericFeature; 21] = [
        NumericFeature::Latitude,
        NumericFeature::Longitude,
        NumericFeature::Elevation,
        NumericFeature::Slope,
        NumericFeature::Rainfall,
        NumericFeature::Temperature,
        NumericFeature::CloudCover,
        NumericFeature::FireAlerts,
        NumericFeature::Ndvi,
        NumericFeature::Ndmi,
        NumericFeature::Evi,
        NumericFeature::TreeCover,
        NumericFeature::CanopyHeight,
        NumericFeature::DistanceToRoad,
        NumericFeature::DistanceToSettlement,
        NumericFeature::DistanceToRiver,
        NumericFeature::ProtectedArea,
        NumericFeature::LoggingConcession,
        NumericFeature::PopulationDensity,
        NumericFeature::ForestLossLast3Y,
        NumericFeature::CumulativeDeforested,
    ];

    /// The training-data column this feature is read from. Also used as the
    /// form label.
    pub fn column(self) -> &'static str {
        match self {
            NumericFeature::Latitude => "Latitude",
            NumericFeature::Longitude => "Longitude",
            NumericFeature::Elevation => "Elevation (m)",
            NumericFeature::Slope => "Slope (°)",
            NumericFeature::Rainfall => "Rainfall (mm)",
            NumericFeature::Temperature => "Temperature (°C)",
            NumericFeature::CloudCover => "Cloud Cover (%)",
            NumericFeature::FireAlerts => "Fire Alerts (7d)",
            NumericFeature::Ndvi => "NDVI (Vegetation Index)",
            NumericFeature::Ndmi => "NDMI (Moisture Index)",
            NumericFeature::Evi => "EVI (Enhanced Vegetation Index)",
            NumericFeature::TreeCover => "Tree Cover (%)",
            NumericFeature::CanopyHeight => "Canopy Height (m)",
            NumericFeature::DistanceToRoad => "Distance to Road (km)",
            NumericFeature::DistanceToSettlement => "Distance to Settlement (km)",
            NumericFeature::DistanceToRiver => "Distance to River (km)",
            NumericFeature::ProtectedArea => "Protected Area (1=Yes,0=No)",
            NumericFeature::LoggingConcession => "Logging Concession (1=Yes,0=No)",
            NumericFeature::PopulationDensity => "Population Density (per km²)",
            NumericFeature::ForestLossLast3Y => "Forest Loss Last 3Y (%)",
            NumericFeature::CumulativeDeforested => "Cumulative Deforested Area (%)",
        }
    }

    /// Yes/no features, encoded as 1 and 0.
    pub fn is_flag(self) -> bool {
        matches!(self, NumericFeature::ProtectedArea | NumericFeature::LoggingConcession)
    }
}

/// Everything known about one tile at prediction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileFeatures {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub slope: f64,
    pub rainfall: f64,
    pub temperature: f64,
    pub cloud_cover: f64,
    pub fire_alerts: f64,
    pub ndvi: f64,
    pub ndmi: f64,
    pub evi: f64,
    pub tree_cover: f64,
    pub canopy_height: f64,
    pub distance_to_road: f64,
    pub distance_to_settlement: f64,
    pub distance_to_river: f64,
    pub protected_area: bool,
    pub logging_concession: bool,
    pub population_density: f64,
    pub forest_loss_last_3y: f64,
    pub cumulative_deforested: f64,
    pub region: Region,
    pub country: Country,
}

impl TileFeatures {
    /// A tile in the given region and country with every numeric input at 0.
    pub fn new(region: Region, country: Country) -> Self {
        TileFeatures {
            latitude: 0.0,
            longitude: 0.0,
            elevation: 0.0,
            slope: 0.0,
            rainfall: 0.0,
            temperature: 0.0,
            cloud_cover: 0.0,
            fire_alerts: 0.0,
            ndvi: 0.0,
            ndmi: 0.0,
            evi: 0.0,
            tree_cover: 0.0,
            canopy_height: 0.0,
            distance_to_road: 0.0,
            distance_to_settlement: 0.0,
            distance_to_river: 0.0,
            protected_area: false,
            logging_concession: false,
            population_density: 0.0,
            forest_loss_last_3y: 0.0,
            cumulative_deforested: 0.0,
            region,
            country,
        }
    }

    pub fn value(&self, feature: NumericFeature) -> f64 {
        match feature {
            NumericFeature::Latitude => self.latitude,
            NumericFeature::Longitude => self.longitude,
            NumericFeature::Elevation => self.elevation,
            NumericFeature::Slope => self.slope,
            NumericFeature::Rainfall => self.rainfall,
            NumericFeature::Temperature => self.temperature,
            NumericFeature::CloudCover => self.cloud_cover,
            NumericFeature::FireAlerts => self.fire_alerts,
            NumericFeature::Ndvi => self.ndvi,
            NumericFeature::Ndmi => self.ndmi,
            NumericFeature::Evi => self.evi,
            NumericFeature::TreeCover => self.tree_cover,
            NumericFeature::CanopyHeight => self.canopy_height,
            NumericFeature::DistanceToRoad => self.distance_to_road,
            NumericFeature::DistanceToSettlement => self.distance_to_settlement,
            NumericFeature::DistanceToRiver => self.distance_to_river,
            NumericFeature::ProtectedArea => flag(self.protected_area),
            NumericFeature::LoggingConcession => flag(self.logging_concession),
            NumericFeature::PopulationDensity => self.population_density,
            NumericFeature::ForestLossLast3Y => self.forest_loss_last_3y,
            NumericFeature::CumulativeDeforested => self.cumulative_deforested,
        }
    }

    /// Sets a numeric input. Flag features treat any non-zero value as yes.
    pub fn set_value(&mut self, feature: NumericFeature, value: f64) {
        let slot = match feature {
            NumericFeature::ProtectedArea => {
                self.protected_area = value != 0.0;
                return;
            }
            NumericFeature::LoggingConcession => {
                self.logging_concession = value != 0.0;
                return;
            }
            NumericFeature::Latitude => &mut self.latitude,
            NumericFeature::Longitude => &mut self.longitude,
            NumericFeature::Elevation => &mut self.elevation,
            NumericFeature::Slope => &mut self.slope,
            NumericFeature::Rainfall => &mut self.rainfall,
            NumericFeature::Temperature => &mut self.temperature,
            NumericFeature::CloudCover => &mut self.cloud_cover,
            NumericFeature::FireAlerts => &mut self.fire_alerts,
            NumericFeature::Ndvi => &mut self.ndvi,
            NumericFeature::Ndmi => &mut self.ndmi,
            NumericFeature::Evi => &mut self.evi,
            NumericFeature::TreeCover => &mut self.tree_cover,
            NumericFeature::CanopyHeight => &mut self.canopy_height,
            NumericFeature::DistanceToRoad => &mut self.distance_to_road,
            NumericFeature::DistanceToSettlement => &mut self.distance_to_settlement,
            NumericFeature::DistanceToRiver => &mut self.distance_to_river,
            NumericFeature::PopulationDensity => &mut self.population_density,
            NumericFeature::ForestLossLast3Y => &mut self.forest_loss_last_3y,
            NumericFeature::CumulativeDeforested => &mut self.cumulative_deforested,
        };
        *slot = value;
    }

    pub fn with(mut self, feature: NumericFeature, value: f64) -> Self {
        self.set_value(feature, value);
        self
    }

    /// Builds the one-row frame laid out like the raw training data: numeric
    /// columns in form order, then `Region` and `Country`.
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let columns = NumericFeature::ALL
            .iter()
            .map(|f| f.column())
            .chain(CATEGORICAL_COLUMNS.iter().copied());
        let mut frame = Frame::new(columns)?;

        let mut row: Vec<Value> =
            NumericFeature::ALL.iter().map(|&f| Value::Number(self.value(f))).collect();
        row.push(Value::from(self.region.as_str()));
        row.push(Value::from(self.country.as_str()));
        frame.push_row(row)?;
        Ok(frame)
    }
}

fn flag(set: bool) -> f64 {
    if set { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_columns_are_unique() {
        let mut columns: Vec<&str> = NumericFeature::ALL.iter().map(|f| f.column()).collect();
        columns.sort();
        columns.dedup();
        assert_eq!(columns.len(), NumericFeature::ALL.len());
    }

    #[test]
    fn set_value_round_trips_every_feature() {
        let mut tile = TileFeatures::new(Region::Amazon, Country::Brazil);
        for (i, &feature) in NumericFeature::ALL.iter().enumerate() {
            let value = if feature.is_flag() { 1.0 } else { i as f64 + 0.5 };
            tile.set_value(feature, value);
            assert_eq!(tile.value(feature), value, "{}", feature.column());
        }
    }

    #[test]
    fn flags_treat_non_zero_as_yes() {
        let tile = TileFeatures::new(Region::Amazon, Country::Peru)
            .with(NumericFeature::ProtectedArea, 7.0)
            .with(NumericFeature::LoggingConcession, 0.0);
        assert!(tile.protected_area);
        assert!(!tile.logging_concession);
    }

    #[test]
    fn to_frame_matches_training_layout() {
        let tile = TileFeatures::new(Region::SeAsia, Country::PapuaNewGuinea)
            .with(NumericFeature::Latitude, -6.3)
            .with(NumericFeature::ProtectedArea, 1.0);
        let frame = tile.to_frame().unwrap();

        assert_eq!(frame.n_rows(), 1);
        assert_eq!(frame.n_cols(), 23);
        assert_eq!(frame.columns()[0], "Latitude");
        assert_eq!(frame.columns()[16], "Protected Area (1=Yes,0=No)");
        assert_eq!(frame.columns()[21], "Region");
        assert_eq!(frame.rows()[0][0], Value::Number(-6.3));
        assert_eq!(frame.rows()[0][16], Value::Number(1.0));
        assert_eq!(frame.rows()[0][21], Value::Text("SE Asia".to_string()));
        assert_eq!(frame.rows()[0][22], Value::Text("Papua New Guinea".to_string()));
    }

    #[test]
    fn deserializes_display_names() {
        let region: Region = serde_json::from_str("\"Congo Basin\"").unwrap();
        let country: Country = serde_json::from_str("\"DRC\"").unwrap();
        assert_eq!(region, Region::CongoBasin);
        assert_eq!(country, Country::Drc);
    }

    #[test]
    fn demo_tile_deserializes() {
        let json = include_str!("../../demos/tile.json");
        let tile: TileFeatures = serde_json::from_str(json).unwrap();
        assert_eq!(tile.region, Region::Amazon);
        assert!(tile.logging_concession);
        assert_eq!(tile.value(NumericFeature::TreeCover), 37.0);
    }
}
