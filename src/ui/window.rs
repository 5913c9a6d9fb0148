use super::{mixer::MixerPage, pages::Pages, props::PropsDialog, utils};
use crate::mixer::hw_cards;
use crate::settings::Settings;

use gtk::{prelude::*, Button, HeaderBar, Inhibit, ResponseType, Window, WindowType};
use tracing::{info, warn};

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

const TITLE: &str = "GTK ALSA Mixer";

pub struct MixerWindow {
    inner: Window,
    settings: Arc<Settings>,
    pages: Pages,
    mixers: RefCell<Vec<MixerPage>>,
    props: RefCell<Option<PropsDialog>>,
}

impl MixerWindow {
    pub fn new(settings: Arc<Settings>) -> Rc<Self> {
        let inner = Window::new(WindowType::Toplevel);
        inner.set_title(TITLE);
        let geometry = settings.r().app().window;
        inner.set_default_size(geometry.width, geometry.height);

        let header = HeaderBar::new();
        header.set_title(Some(TITLE));
        header.set_show_close_button(true);
        let props_button = Button::with_label("Properties");
        let quit_button = Button::with_label("Quit");
        header.pack_start(&props_button);
        header.pack_end(&quit_button);
        inner.set_titlebar(Some(&header));

        let mut pages = Pages::new();
        let mut mixers = Vec::new();
        for card in hw_cards() {
            match MixerPage::new(&card, &settings) {
                Ok(page) => {
                    let label = page.display_name(settings.r().cards().prefs(page.config_name()));
                    pages.append(&label, page.widget());
                    mixers.push(page);
                }
                Err(e) => warn!("{}: could not open mixer: {}", card, e),
            }
        }
        info!("Found {} mixers", mixers.len());

        if mixers.is_empty() {
            inner.add(&utils::mixer_label("No controllable devices are detected.", false));
            props_button.set_sensitive(false);
        } else {
            inner.add(pages.widget());
        }

        let this = Rc::new(Self {
            inner,
            settings,
            pages,
            mixers: RefCell::new(mixers),
            props: RefCell::new(None),
        });

        let weak = Rc::downgrade(&this);
        props_button.connect_clicked(move |_| {
            if let Some(this) = weak.upgrade() {
                this.show_props();
            }
        });

        let win = this.inner.clone();
        quit_button.connect_clicked(move |_| win.close());

        let weak = Rc::downgrade(&this);
        this.inner.connect_delete_event(move |_, _| {
            if let Some(this) = weak.upgrade() {
                this.save_geometry();
            }
            Inhibit(false)
        });
        this.inner.connect_destroy(|_| gtk::main_quit());

        this
    }

    pub fn show(&self) {
        self.inner.show_all();
        for page in self.mixers.borrow().iter() {
            page.apply_visibility();
        }
    }

    fn save_geometry(&self) {
        let (width, height) = self.inner.get_size();
        {
            let mut app = self.settings.w().app();
            app.window.width = width;
            app.window.height = height;
        }
        if let Err(e) = self.settings.sync() {
            warn!("Could not save window geometry: {}", e);
        }
    }

    /// Open the properties dialog for the current card, or raise it if open
    fn show_props(self: &Rc<Self>) {
        if let Some(props) = self.props.borrow().as_ref() {
            props.present();
            return;
        }

        let pos = match self.pages.current() {
            Some(pos) => pos,
            None => return,
        };
        let mixers = self.mixers.borrow();
        let page = match mixers.get(pos as usize) {
            Some(page) => page,
            None => return,
        };

        let name = page.display_name(self.settings.r().cards().prefs(page.config_name()));
        let props = PropsDialog::new(&self.inner, pos, page, &name);

        let weak = Rc::downgrade(self);
        props.dialog().connect_response(move |_, response| {
            if let Some(this) = weak.upgrade() {
                match response {
                    ResponseType::Apply => this.apply_props(),
                    _ => this.close_props(),
                }
            }
        });
        *self.props.borrow_mut() = Some(props);
    }

    fn apply_props(&self) {
        let (pos, display_name, hidden) = match self.props.borrow().as_ref() {
            Some(props) => (props.page(), props.display_name(), props.hidden()),
            None => return,
        };

        let mut mixers = self.mixers.borrow_mut();
        let page = match mixers.get_mut(pos as usize) {
            Some(page) => page,
            None => return,
        };

        let label = {
            let mut cards = self.settings.w().cards();
            let prefs = cards.prefs_mut(page.config_name());
            prefs.display_name = display_name;
            prefs.hidden = hidden.clone();
            page.display_name(Some(&*prefs))
        };
        self.pages.set_label(pos, &label);
        page.set_hidden(hidden);

        if let Err(e) = self.settings.sync() {
            warn!("Could not save card preferences: {}", e);
        }
    }

    fn close_props(&self) {
        let props = self.props.borrow_mut().take();
        if let Some(props) = props {
            props.close();
        }
    }
}
