//! Dropdown configuration
//!
//! `DropdownConfig` is fixed once a dropdown is constructed. It comes
//! either from code, from a (partial) JSON object through serde, or from
//! the `data-dropdown-*` attributes of a container via
//! [`DropdownConfig::from_dataset`].

use std::fmt;
use std::str::FromStr;

use eventdesk_dom::DOMStringMap;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Menu placement relative to the trigger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopStart,
    TopEnd,
    #[default]
    BottomStart,
    BottomEnd,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::TopStart,
        Position::TopEnd,
        Position::BottomStart,
        Position::BottomEnd,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopStart => "top-start",
            Self::TopEnd => "top-end",
            Self::BottomStart => "bottom-start",
            Self::BottomEnd => "bottom-end",
        }
    }

    /// Parse a markup value, falling back to bottom-start
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|err: ConfigError| {
            tracing::warn!("{}, using bottom-start", err);
            Self::BottomStart
        })
    }
}

impl FromStr for Position {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownPosition(s.to_string()))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the pointer opens the menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Click on the trigger toggles
    #[default]
    Click,
    /// Pointer entering the container opens, leaving closes
    Hover,
    /// No pointer wiring; the host calls open/close
    Manual,
}

impl TriggerMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Hover => "hover",
            Self::Manual => "manual",
        }
    }

    /// Parse a markup value; unknown values disable pointer wiring
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|err: ConfigError| {
            tracing::warn!("{}, no pointer wiring installed", err);
            Self::Manual
        })
    }
}

impl FromStr for TriggerMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "click" => Ok(Self::Click),
            "hover" => Ok(Self::Hover),
            "manual" => Ok(Self::Manual),
            other => Err(ConfigError::UnknownTrigger(other.to_string())),
        }
    }
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dropdown behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DropdownConfig {
    pub position: Position,
    #[serde(rename = "trigger")]
    pub trigger_mode: TriggerMode,
    pub close_on_click_outside: bool,
    pub close_on_select: bool,
    /// Only consulted when `close_on_select` is set
    pub auto_close: bool,
}

impl Default for DropdownConfig {
    fn default() -> Self {
        Self {
            position: Position::BottomStart,
            trigger_mode: TriggerMode::Click,
            close_on_click_outside: true,
            close_on_select: true,
            auto_close: true,
        }
    }
}

impl DropdownConfig {
    /// Read `data-dropdown-*` attributes
    ///
    /// Missing or empty position/trigger values take the defaults. Flags
    /// are on unless the attribute is exactly `"false"`.
    pub fn from_dataset(dataset: &DOMStringMap) -> Self {
        let non_empty = |key: &str| dataset.get(key).filter(|v| !v.is_empty());
        let flag = |key: &str| dataset.get(key) != Some("false");

        Self {
            position: non_empty("dropdownPosition")
                .map(Position::parse_lenient)
                .unwrap_or_default(),
            trigger_mode: non_empty("dropdownTrigger")
                .map(TriggerMode::parse_lenient)
                .unwrap_or_default(),
            close_on_click_outside: flag("dropdownCloseOnClickOutside"),
            close_on_select: flag("dropdownCloseOnSelect"),
            auto_close: flag("dropdownAutoClose"),
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_trigger_mode(mut self, trigger_mode: TriggerMode) -> Self {
        self.trigger_mode = trigger_mode;
        self
    }

    pub fn with_close_on_click_outside(mut self, enabled: bool) -> Self {
        self.close_on_click_outside = enabled;
        self
    }

    pub fn with_close_on_select(mut self, enabled: bool) -> Self {
        self.close_on_select = enabled;
        self
    }

    pub fn with_auto_close(mut self, enabled: bool) -> Self {
        self.auto_close = enabled;
        self
    }

    /// Whether item clicks close the menu
    pub fn closes_on_item_click(&self) -> bool {
        self.close_on_select && self.auto_close
    }
}
