//! Screen configuration, loaded from JSON with per-field defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{CLICK_INTERVAL_MS, MAXIMIZED_PADDING_PX, RESIZE_DEBOUNCE_MS};
use crate::error::ScreenError;

/// Tunables for one screen. Every field is optional in the JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Maximum gap between presses that still counts as a multi-click.
    pub click_interval_ms: f64,
    /// Quiet period after the last viewport resize before windows are re-laid out.
    pub resize_debounce_ms: u32,
    /// Delay before coalesced repaints are flushed.
    pub repaint_delay_ms: u32,
    /// Padding around a maximized window's canvas, in CSS pixels.
    pub maximized_padding_px: f64,
    /// CSS background of the window chrome element.
    pub chrome_background: String,
    /// CSS box shadow of a window floating over the page body.
    pub chrome_shadow: String,
    /// Id of the element that receives pointer capture.
    pub screen_element_id: String,
    /// Force a device scale instead of deriving it from the display.
    pub device_scale: Option<u32>,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            click_interval_ms: CLICK_INTERVAL_MS,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            repaint_delay_ms: 0,
            maximized_padding_px: MAXIMIZED_PADDING_PX,
            chrome_background: "#F4F4F4CC".to_owned(),
            chrome_shadow: "1px 1px 8px grey".to_owned(),
            screen_element_id: "ScreenDiv".to_owned(),
            device_scale: None,
        }
    }
}

impl ScreenConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::Config`] if the JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, ScreenError> {
        Ok(serde_json::from_str(json)?)
    }
}
