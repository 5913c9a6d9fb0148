//! Mixer side of gamix: element access, volume mapping and the
//! slider/switch engines driven by the UI.

mod dual;
mod element;
mod enumerate;
mod pan;
mod session;
mod switch;
mod volume_mapping;

#[cfg(test)]
pub(crate) mod testing;

pub use dual::{get_channel_volume, set_channel_volume, DualState, DualStyle, DualView};
pub use element::{AlsaElement, Channel, Direction, Element, Rounding};
pub use enumerate::{hw_cards, probe_cards};
pub use pan::{get_pan, get_volume, set_volume, split, PanStyle, PanView, SliderState};
pub use session::{
    CardInfo, Interest, MixerSession, Observers, PendingObservers, PollDescriptor, Refresh,
};
pub use switch::{Switch, SwitchRole, SwitchView};

use crate::error::Error;

pub type CardId = String;
pub type Volume = i64;
/// Hundredths of a decibel, as ALSA reports them
pub type MilliBel = i64;

/// Characters which may not appear in a settings key
const CONFIG_DELIMITERS: &[char] = &[' ', '&', '(', ')', '+', '/', ','];

/// Turn a card or element name into a key usable in the settings files
pub fn config_name(name: &str) -> String {
    name.chars()
        .map(|c| if CONFIG_DELIMITERS.contains(&c) { '_' } else { c })
        .collect()
}

/// The two slider layouts a volume element can be shown with
///
/// Both keep the element and the on-screen sliders in sync; they only
/// differ in how a stereo element is presented to the user.
pub trait VolumeControl: Refresh {
    /// The mixer element name this control drives
    fn name(&self) -> &str;

    /// Whether the element only has a single channel
    fn is_mono(&self) -> bool;
}

/// Guard which marks a control as refreshing for its lifetime
///
/// Any change notification that arrives while the guard is alive comes
/// from our own display update and must not be written back.
pub(crate) struct Refreshing<'a> {
    flag: &'a std::cell::Cell<bool>,
    previous: bool,
}

impl<'a> Refreshing<'a> {
    pub(crate) fn enter(flag: &'a std::cell::Cell<bool>) -> Self {
        let previous = flag.replace(true);
        Self { flag, previous }
    }
}

impl Drop for Refreshing<'_> {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}

/// Fail fast on elements that have no volume at all
pub(crate) fn require_volume<E: Element + ?Sized>(element: &E) -> Result<(), Error> {
    element.volume_direction().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_name_replaces_delimiters() {
        assert_eq!(config_name("Mic Boost (+20dB)"), "Mic_Boost___20dB_");
        assert_eq!(config_name("Front/Rear,Side&Bass"), "Front_Rear_Side_Bass");
        assert_eq!(config_name("PCM"), "PCM");
    }

    #[test]
    fn refreshing_guard_resets_on_drop() {
        let flag = std::cell::Cell::new(false);
        {
            let _outer = Refreshing::enter(&flag);
            {
                let _inner = Refreshing::enter(&flag);
                assert!(flag.get());
            }
            // the inner guard must not clear the outer one
            assert!(flag.get());
        }
        assert!(!flag.get());
    }
}
