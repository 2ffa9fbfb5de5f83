//! Design-assist suggestions and the print-readiness margin check.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clip::PrintArea;
use crate::element::ElementId;
use crate::property::Property;
use crate::scene::Scene;

/// Colors offered by the color-harmony picker.
pub const HARMONY_COLORS: [&str; 4] = ["#1a472a", "#e2e8f0", "#1e293b", "#f59e0b"];

/// A suggestion the assistant can apply to the active element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Suggestion {
    /// Fill color.
    Color(String),
    /// Font family.
    Font(String),
}

impl From<Suggestion> for Property {
    fn from(suggestion: Suggestion) -> Self {
        match suggestion {
            Suggestion::Color(color) => Self::Fill(color),
            Suggestion::Font(font) => Self::FontFamily(font),
        }
    }
}

/// Result of the safe-area margin check for one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginStatus {
    /// Bounding box is inside the print area by at least the safety margin.
    WithinLimits,
    /// Bounding box crosses into the margin band or outside the print area.
    NearEdge,
}

impl fmt::Display for MarginStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WithinLimits => write!(f, "Within Limits"),
            Self::NearEdge => write!(f, "Near Edge"),
        }
    }
}

/// Margin status of every visible element, bottom-first.
#[must_use]
pub fn margin_report(scene: &Scene, area: &PrintArea, margin: f32) -> Vec<(ElementId, MarginStatus)> {
    let safe = area.rect().inset(margin);
    scene
        .elements()
        .filter(|element| element.visible)
        .map(|element| {
            let status = if safe.contains_rect(&element.bounding_box()) {
                MarginStatus::WithinLimits
            } else {
                MarginStatus::NearEdge
            };
            (element.id, status)
        })
        .collect()
}

/// Overall status: near edge if any element is.
#[must_use]
pub fn overall_margin(report: &[(ElementId, MarginStatus)]) -> MarginStatus {
    if report.iter().any(|(_, status)| *status == MarginStatus::NearEdge) {
        MarginStatus::NearEdge
    } else {
        MarginStatus::WithinLimits
    }
}
