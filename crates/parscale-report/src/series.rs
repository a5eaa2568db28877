// Dweve ParScale - Parallel Scaling Analysis
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Plot series handed to the rendering layer.

use parscale_core::Phase;
use serde::Serialize;

/// Quantity on the horizontal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum XAxis {
    /// Thread count.
    Threads,
    /// Input size.
    InputSize,
}

/// Guide lines drawn alongside measured series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceLine {
    /// `y = threads`.
    IdealLinear,
    /// Speedup of exactly one.
    SerialBaseline,
    /// Throughput of the serial run.
    SerialThroughput,
    /// 100% efficiency.
    IdealEfficiency,
}

impl ReferenceLine {
    /// Legend text.
    pub fn label(&self) -> &'static str {
        match self {
            ReferenceLine::IdealLinear => "Ideal Linear",
            ReferenceLine::SerialBaseline => "Serial Baseline",
            ReferenceLine::SerialThroughput => "Serial Throughput",
            ReferenceLine::IdealEfficiency => "100% (Ideal)",
        }
    }
}

/// What a series represents, for styling.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SeriesIdentity {
    /// One execution phase.
    Phase(Phase),
    /// One algorithm variant.
    Algorithm(String),
    /// One thread count.
    Threads(u32),
    /// One input size.
    InputSize(u64),
    /// A guide line.
    Reference(ReferenceLine),
}

/// A named list of `(x, y)` points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Stable machine name, e.g. `phase_speedup/scan_linklist`.
    pub name: String,
    /// Legend text.
    pub label: String,
    /// Styling identity.
    pub identity: SeriesIdentity,
    /// Meaning of `x`.
    pub x_axis: XAxis,
    /// Points in ascending `x`.
    pub points: Vec<(f64, f64)>,
}

impl Series {
    /// Creates an empty series.
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        identity: SeriesIdentity,
        x_axis: XAxis,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            identity,
            x_axis,
            points: Vec::new(),
        }
    }

    /// A guide line through the given points.
    pub fn reference(
        name: impl Into<String>,
        line: ReferenceLine,
        x_axis: XAxis,
        points: Vec<(f64, f64)>,
    ) -> Self {
        Self {
            points,
            ..Self::new(name, line.label(), SeriesIdentity::Reference(line), x_axis)
        }
    }

    /// Appends a point.
    pub fn push(&mut self, x: f64, y: f64) {
        self.points.push((x, y));
    }

    /// Returns whether the series has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// The `y` value at `x`, if present.
    pub fn y_at(&self, x: f64) -> Option<f64> {
        self.points.iter().find(|(px, _)| *px == x).map(|(_, y)| *y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_series_uses_line_label() {
        let series = Series::reference(
            "reference/ideal_linear",
            ReferenceLine::IdealLinear,
            XAxis::Threads,
            vec![(1.0, 1.0), (8.0, 8.0)],
        );
        assert_eq!(series.label, "Ideal Linear");
        assert_eq!(series.y_at(8.0), Some(8.0));
        assert_eq!(series.y_at(4.0), None);
    }

    #[test]
    fn test_identity_serialization() {
        let json = serde_json::to_string(&SeriesIdentity::Phase(Phase::ScanLinkList)).unwrap();
        assert_eq!(json, r#"{"kind":"phase","value":"scan_linklist"}"#);
        let json = serde_json::to_string(&XAxis::InputSize).unwrap();
        assert_eq!(json, r#""input_size""#);
    }
}
