#![forbid(unsafe_code)]

//! Style output applied to the panel's root element.

use serde::Serialize;

/// CSS `position` value carried by a pinned panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Fixed,
}

impl Position {
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
        }
    }
}

/// Inline style for the panel.
///
/// The default value is the empty style of a panel in normal flow, and
/// serializes to `{}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PanelStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl PanelStyle {
    /// Style for a panel pinned below the header.
    #[must_use]
    pub fn fixed(width: f64, top: f64, class: impl Into<String>) -> Self {
        Self {
            position: Some(Position::Fixed),
            width: Some(width),
            top: Some(top),
            class: Some(class.into()),
        }
    }

    /// Whether this is the empty, in-flow style.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.width.is_none() && self.top.is_none()
    }

    /// Inline declaration string, e.g. `position: fixed; width: 800px; top: 64px;`.
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut decls = Vec::with_capacity(3);
        if let Some(position) = self.position {
            decls.push(format!("position: {};", position.as_css()));
        }
        if let Some(width) = self.width {
            decls.push(format!("width: {width}px;"));
        }
        if let Some(top) = self.top {
            decls.push(format!("top: {top}px;"));
        }
        decls.join(" ")
    }
}
