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

//! Editable state behind the prediction form, independent of the terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::errors::FormError;
use crate::features::{Country, NumericFeature, Region, TileFeatures};

/// What a form field feeds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTarget {
    Region,
    Country,
    Numeric(NumericFeature),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    Choice { options: Vec<&'static str>, selected: usize },
    Number { buffer: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub target: FieldTarget,
    pub input: FieldInput,
}

impl FormField {
    fn choice(target: FieldTarget, options: Vec<&'static str>) -> Self {
        FormField { target, input: FieldInput::Choice { options, selected: 0 } }
    }

    fn number(feature: NumericFeature) -> Self {
        FormField {
            target: FieldTarget::Numeric(feature),
            input: FieldInput::Number { buffer: "0".to_string() },
        }
    }

    pub fn label(&self) -> &'static str {
        match self.target {
            FieldTarget::Region => "Region",
            FieldTarget::Country => "Country",
            FieldTarget::Numeric(feature) => feature.column(),
        }
    }

    /// The text shown in the field box.
    pub fn display_value(&self) -> String {
        match &self.input {
            FieldInput::Choice { options, selected } => format!("◀ {} ▶", options[*selected]),
            FieldInput::Number { buffer } => buffer.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Predict,
    Quit,
}

/// Grid of fields in display rows, followed by the Predict Risk button.
#[derive(Debug, Clone)]
pub struct PredictionForm {
    fields: Vec<FormField>,
    row_lengths: Vec<usize>,
    focus: usize,
}

impl Default for PredictionForm {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionForm {
    pub fn new() -> Self {
        use NumericFeature::*;

        let flag = |feature| FormField::choice(FieldTarget::Numeric(feature), vec!["0", "1"]);
        let rows: Vec<Vec<FormField>> = vec![
            vec![
                FormField::choice(
                    FieldTarget::Region,
                    Region::ALL.iter().map(|r| r.as_str()).collect(),
                ),
                FormField::choice(
                    FieldTarget::Country,
                    Country::ALL.iter().map(|c| c.as_str()).collect(),
                ),
                flag(ProtectedArea),
                flag(LoggingConcession),
            ],
            [Latitude, Longitude, Elevation, Slope].map(FormField::number).to_vec(),
            [Rainfall, Temperature, CloudCover, FireAlerts].map(FormField::number).to_vec(),
            [Ndvi, Ndmi, Evi, TreeCover].map(FormField::number).to_vec(),
            [CanopyHeight, DistanceToRoad, DistanceToSettlement, DistanceToRiver]
                .map(FormField::number)
                .to_vec(),
            [PopulationDensity, ForestLossLast3Y, CumulativeDeforested]
                .map(FormField::number)
                .to_vec(),
        ];

        let row_lengths = rows.iter().map(Vec::len).collect();
        PredictionForm { fields: rows.into_iter().flatten().collect(), row_lengths, focus: 0 }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Field counts of each display row, top to bottom.
    pub fn row_lengths(&self) -> &[usize] {
        &self.row_lengths
    }

    /// Index of the focused field; `fields().len()` means the button.
    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn button_focused(&self) -> bool {
        self.focus == self.fields.len()
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % (self.fields.len() + 1);
    }

    pub fn focus_previous(&mut self) {
        let slots = self.fields.len() + 1;
        self.focus = (self.focus + slots - 1) % slots;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return FormAction::Quit;
        }
        match key.code {
            KeyCode::Esc => return FormAction::Quit,
            KeyCode::Enter => return FormAction::Predict,
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_previous(),
            KeyCode::Left => self.cycle(false),
            KeyCode::Right => self.cycle(true),
            KeyCode::Backspace => {
                if let Some(FieldInput::Number { buffer }) = self.focused_input() {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(FieldInput::Number { buffer }) = self.focused_input() {
                    if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E') {
                        buffer.push(c);
                    }
                }
            }
            _ => {}
        }
        FormAction::None
    }

    /// Parses every field into a tile. The error names the first bad field.
    pub fn tile_features(&self) -> Result<TileFeatures, FormError> {
        let mut tile = TileFeatures::new(Region::ALL[0], Country::ALL[0]);
        for field in &self.fields {
            match (field.target, &field.input) {
                (FieldTarget::Region, FieldInput::Choice { selected, .. }) => {
                    tile.region = Region::ALL[*selected];
                }
                (FieldTarget::Country, FieldInput::Choice { selected, .. }) => {
                    tile.country = Country::ALL[*selected];
                }
                (FieldTarget::Numeric(feature), FieldInput::Choice { options, selected }) => {
                    tile.set_value(feature, parse_number(field.label(), options[*selected])?);
                }
                (FieldTarget::Numeric(feature), FieldInput::Number { buffer }) => {
                    tile.set_value(feature, parse_number(field.label(), buffer)?);
                }
                (FieldTarget::Region | FieldTarget::Country, FieldInput::Number { .. }) => {}
            }
        }
        Ok(tile)
    }

    fn focused_input(&mut self) -> Option<&mut FieldInput> {
        self.fields.get_mut(self.focus).map(|f| &mut f.input)
    }

    fn cycle(&mut self, forward: bool) {
        if let Some(FieldInput::Choice { options, selected }) = self.focused_input() {
            let n = options.len();
            *selected = if forward { (*selected + 1) % n } else { (*selected + n - 1) % n };
        }
    }
}

fn parse_number(label: &str, input: &str) -> Result<f64, FormError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FormError::Empty { label: label.to_string() });
    }
    let value = trimmed.parse::<f64>().map_err(|_| FormError::NotANumber {
        label: label.to_string(),
        input: trimmed.to_string(),
    })?;
    if !value.is_finite() {
        return Err(FormError::NotFinite { label: label.to_string() });
    }
    Ok(value)
}
