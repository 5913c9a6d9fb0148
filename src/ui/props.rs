use super::mixer::MixerPage;
use gtk::prelude::*;
use gtk::{
    CheckButton, Dialog, DialogFlags, Entry, Label, Orientation, ResponseType, Separator, Window,
};

use std::collections::BTreeSet;

/// The properties dialog for one card: tab name and visible controls
pub(super) struct PropsDialog {
    inner: Dialog,
    /// Page position the dialog was opened for
    page: u32,
    name: Entry,
    default_name: String,
    controls: Vec<(String, CheckButton)>,
}

impl PropsDialog {
    pub fn new(parent: &Window, page: u32, mixer: &MixerPage, display_name: &str) -> Self {
        let inner = Dialog::with_buttons(
            Some(format!("{} Properties", display_name).as_str()),
            Some(parent),
            DialogFlags::DESTROY_WITH_PARENT,
            &[("Close", ResponseType::Close), ("Apply", ResponseType::Apply)],
        );
        inner.set_default_response(ResponseType::Apply);

        let vbox = inner.get_content_area();
        vbox.set_orientation(Orientation::Vertical);
        vbox.set_margin_start(15);
        vbox.set_margin_end(15);
        vbox.set_margin_top(15);
        vbox.set_margin_bottom(5);
        vbox.set_spacing(5);

        let hbox = gtk::Box::new(Orientation::Horizontal, 5);
        hbox.pack_start(&Label::new(Some("Name:")), false, false, 0);
        let name = Entry::new();
        name.set_text(display_name);
        name.set_activates_default(true);
        hbox.pack_start(&name, true, true, 0);
        vbox.pack_start(&hbox, false, false, 0);

        vbox.pack_start(&Separator::new(Orientation::Horizontal), false, false, 0);
        let visible = Label::new(Some("Visible controls:"));
        visible.set_xalign(0.0);
        vbox.pack_start(&visible, false, false, 0);

        let controls = mixer
            .controls()
            .into_iter()
            .map(|control| {
                let cb = CheckButton::with_label(&control.name);
                cb.set_active(control.visible);
                vbox.pack_start(&cb, false, false, 0);
                (control.config_name, cb)
            })
            .collect();

        inner.show_all();

        Self {
            inner,
            page,
            name,
            default_name: mixer.info().mixer_name.clone(),
            controls,
        }
    }

    pub fn dialog(&self) -> &Dialog {
        &self.inner
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn present(&self) {
        self.inner.present();
    }

    pub fn close(&self) {
        self.inner.close();
    }

    /// The tab name to store, `None` when it is the mixer's own name
    pub fn display_name(&self) -> Option<String> {
        let text = self.name.get_text().trim().to_owned();
        if text.is_empty() || text == self.default_name {
            None
        } else {
            Some(text)
        }
    }

    /// Config names of the unchecked controls
    pub fn hidden(&self) -> BTreeSet<String> {
        self.controls
            .iter()
            .filter(|(_, cb)| !cb.get_active())
            .map(|(config_name, _)| config_name.clone())
            .collect()
    }
}
