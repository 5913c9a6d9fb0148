//! Toggle buttons bound to element switches.

use super::utils;
use crate::error::Error;
use crate::mixer::{
    AlsaElement, Element, MixerSession, PendingObservers, Switch, SwitchRole, SwitchView,
};
use crate::settings::ToggleStyle;

use glib::SignalHandlerId;
use gtk::{prelude::*, ToggleButton};
use tracing::warn;

use std::rc::Rc;

struct ToggleView {
    button: ToggleButton,
    handler: SignalHandlerId,
}

impl SwitchView for ToggleView {
    fn show(&self, active: bool) {
        utils::blocked(&self.button, &self.handler, |b| b.set_active(active));
    }
}

/// Build a toggle for one switch of `element`, queueing it for refreshes
pub(super) fn bind(
    pending: &mut PendingObservers,
    element: AlsaElement,
    role: SwitchRole,
    label: &str,
    style: ToggleStyle,
) -> Result<ToggleButton, Error> {
    let switch = Rc::new(Switch::new(element, role)?);
    let button = utils::toggle_button(label, style);
    button.set_active(switch.state()?);

    let weak = Rc::downgrade(&switch);
    let handler = button.connect_toggled(move |b| {
        if let Some(switch) = weak.upgrade() {
            if let Err(e) = switch.toggled(b.get_active()) {
                warn!("{}: switch write rejected: {}", switch.element().name(), e);
            }
        }
    });

    switch.set_view(Rc::new(ToggleView {
        button: button.clone(),
        handler,
    }));
    pending.add(switch);
    Ok(button)
}

/// A switch-only element shown in the toggle row
pub(super) struct Toggle {
    name: String,
    config_name: String,
    button: ToggleButton,
}

impl Toggle {
    pub fn new(
        session: &MixerSession,
        element: AlsaElement,
        style: ToggleStyle,
    ) -> Result<Self, Error> {
        let name = element.name().to_owned();
        let mut pending = PendingObservers::default();
        let button = bind(&mut pending, element, SwitchRole::Plain, &name, style)?;
        session.register_all(pending);
        button.set_tooltip_text(Some(&name));
        utils::margin(&button, 2);
        button.set_halign(gtk::Align::Start);

        Ok(Self {
            config_name: crate::mixer::config_name(&name),
            name,
            button,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config_name(&self) -> &str {
        &self.config_name
    }

    pub fn widget(&self) -> &ToggleButton {
        &self.button
    }
}
