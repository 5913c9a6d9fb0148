//! Implements the page shown for one sound card's mixer.

use super::{
    slider::{SizeGroups, Slider},
    toggle::Toggle,
    utils,
};
use crate::dispatcher::Dispatcher;
use crate::error::Error;
use crate::mixer::{config_name, CardInfo, Direction, Element, MixerSession};
use crate::settings::{CardPrefs, Settings};

use gtk::{prelude::*, Orientation, PolicyType, Separator};
use tracing::{debug, info, warn};

use std::collections::BTreeSet;
use std::rc::Rc;
use std::sync::Arc;

/// Switch-only elements are stacked this many to a column
const TOGGLES_PER_COLUMN: usize = 5;

/// A control as listed in the properties dialog
pub(super) struct ControlEntry {
    pub name: String,
    pub config_name: String,
    pub visible: bool,
}

pub(super) struct MixerPage {
    root: gtk::Box,
    sliders: Vec<Slider>,
    toggles: Vec<Toggle>,
    config_name: String,
    hidden: BTreeSet<String>,
    dispatcher: Option<Dispatcher>,
    session: Rc<MixerSession>,
}

impl MixerPage {
    pub fn new(card_id: &str, settings: &Arc<Settings>) -> Result<Self, Error> {
        let session = Rc::new(MixerSession::open(card_id)?);
        let info = session.info().clone();
        let config_name = config_name(&info.mixer_name);
        info!("Card {}: {} ({})", info.id, info.name, info.mixer_name);

        let (style, toggle_style) = {
            let app = settings.r().app();
            (app.slider_style, app.toggle_style)
        };
        let hidden = settings
            .r()
            .cards()
            .prefs(&config_name)
            .map(|prefs| prefs.hidden.clone())
            .unwrap_or_default();

        let groups = SizeGroups::new();
        let slider_box = gtk::Box::new(Orientation::Horizontal, 0);
        slider_box.set_homogeneous(true);
        let toggle_box = gtk::Box::new(Orientation::Horizontal, 0);
        toggle_box.set_homogeneous(true);

        let mut sliders = Vec::new();
        let mut toggles = Vec::new();
        let mut column: Option<gtk::Box> = None;

        for element in session.elements() {
            if element.is_enumerated() {
                debug!("{}: skipping enumerated element {}", info.id, element.name());
                continue;
            }

            let has_volume =
                element.has_volume(Direction::Playback) || element.has_volume(Direction::Capture);
            let has_switch =
                element.has_switch(Direction::Playback) || element.has_switch(Direction::Capture);

            if has_volume {
                match Slider::new(&session, element, style, toggle_style, &groups) {
                    Ok(slider) => {
                        slider_box.pack_start(slider.widget(), true, true, 0);
                        sliders.push(slider);
                    }
                    Err(e) => warn!("{}: {}", info.id, e),
                }
            } else if has_switch {
                let toggle = match Toggle::new(&session, element, toggle_style) {
                    Ok(toggle) => toggle,
                    Err(e) => {
                        warn!("{}: {}", info.id, e);
                        continue;
                    }
                };

                if toggles.len() % TOGGLES_PER_COLUMN == 0 {
                    let vbox = gtk::Box::new(Orientation::Vertical, 0);
                    toggle_box.pack_start(&vbox, true, true, 0);
                    column = Some(vbox);
                }
                if let Some(ref vbox) = column {
                    vbox.pack_start(toggle.widget(), false, false, 0);
                }
                toggles.push(toggle);
            } else {
                warn!("{}: {}", info.id, Error::Unsupported(element.name().to_owned()));
            }
        }

        let root = gtk::Box::new(Orientation::Vertical, 0);
        if sliders.is_empty() && toggles.is_empty() {
            root.pack_start(&utils::mixer_label("Device Has No Controls", false), true, true, 0);
        } else {
            let scroll = utils::wrap_scroll(&slider_box);
            scroll.set_policy(PolicyType::Automatic, PolicyType::Never);
            root.pack_start(&scroll, true, true, 0);
            root.pack_start(&Separator::new(Orientation::Horizontal), false, false, 0);
            root.pack_start(&toggle_box, false, false, 0);
        }
        debug!(
            "{}: {} sliders, {} toggles",
            info.id,
            sliders.len(),
            toggles.len()
        );

        let dispatcher = match Dispatcher::attach(session.clone()) {
            Ok(dispatcher) => Some(dispatcher),
            Err(e) => {
                warn!("{}: changes made elsewhere will not show: {}", info.id, e);
                None
            }
        };

        Ok(Self {
            root,
            sliders,
            toggles,
            config_name,
            hidden,
            dispatcher,
            session,
        })
    }

    pub fn widget(&self) -> &gtk::Box {
        &self.root
    }

    pub fn info(&self) -> &CardInfo {
        self.session.info()
    }

    /// Key of this card in the settings
    pub fn config_name(&self) -> &str {
        &self.config_name
    }

    /// The tab label, as renamed by the user or the mixer's own name
    pub fn display_name(&self, prefs: Option<&CardPrefs>) -> String {
        prefs
            .and_then(|p| p.display_name.clone())
            .unwrap_or_else(|| self.info().mixer_name.clone())
    }

    pub fn controls(&self) -> Vec<ControlEntry> {
        let sliders = self
            .sliders
            .iter()
            .map(|s| (s.name(), s.config_name()));
        let toggles = self
            .toggles
            .iter()
            .map(|t| (t.name(), t.config_name()));

        sliders
            .chain(toggles)
            .map(|(name, config_name)| ControlEntry {
                name: name.to_owned(),
                config_name: config_name.to_owned(),
                visible: !self.hidden.contains(config_name),
            })
            .collect()
    }

    /// Show every control except those in `hidden`
    pub fn set_hidden(&mut self, hidden: BTreeSet<String>) {
        self.hidden = hidden;
        self.apply_visibility();
    }

    pub fn apply_visibility(&self) {
        for slider in &self.sliders {
            slider
                .widget()
                .set_visible(!self.hidden.contains(slider.config_name()));
        }
        for toggle in &self.toggles {
            toggle
                .widget()
                .set_visible(!self.hidden.contains(toggle.config_name()));
        }
    }
}

impl Drop for MixerPage {
    fn drop(&mut self) {
        self.dispatcher.take();
        debug!("Closed mixer page for {}", self.session.info().id);
    }
}
