use serde::{Deserialize, Serialize};

/// gamix application settings tree
///
/// These settings modify how the mixer pages are laid out and remember
/// the window between runs.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// How stereo volume elements are shown
    pub slider_style: SliderStyle,
    /// Which widget switches are drawn with
    pub toggle_style: ToggleStyle,
    pub window: WindowGeometry,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            slider_style: SliderStyle::Pan,
            toggle_style: ToggleStyle::Check,
            window: WindowGeometry::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SliderStyle {
    /// One volume slider and one pan slider
    Pan,
    /// One slider per channel with a lock button
    Dual,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToggleStyle {
    Toggle,
    Check,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub width: i32,
    pub height: i32,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            width: 480,
            height: 350,
        }
    }
}
