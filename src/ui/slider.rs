//! Volume columns on a mixer page, in pan or dual style.

use super::{toggle, utils};
use crate::error::Error;
use crate::mixer::{
    config_name, AlsaElement, Direction, DualStyle, DualView, Element, MixerSession, PanStyle,
    PanView, PendingObservers, SwitchRole, VolumeControl,
};
use crate::settings::{SliderStyle, ToggleStyle};

use gdk::EventType;
use glib::SignalHandlerId;
use gtk::{
    prelude::*, Adjustment, Inhibit, Label, Orientation, Scale, ScaleBuilder, Separator,
    SizeGroup, SizeGroupMode, Widget,
};
use tracing::warn;

use std::rc::Rc;

/// Keeps the pan, mute and capture rows aligned across a page
pub(super) struct SizeGroups {
    pan: SizeGroup,
    mute: SizeGroup,
    capture: SizeGroup,
}

impl SizeGroups {
    pub fn new() -> Self {
        Self {
            pan: SizeGroup::new(SizeGroupMode::Both),
            mute: SizeGroup::new(SizeGroupMode::Both),
            capture: SizeGroup::new(SizeGroupMode::Both),
        }
    }
}

fn volume_adjustment(value: i32) -> Adjustment {
    Adjustment::new(f64::from(value), 0.0, 101.0, 1.0, 5.0, 1.0)
}

fn volume_scale(adj: &Adjustment) -> Scale {
    ScaleBuilder::new()
        .adjustment(adj)
        .orientation(Orientation::Vertical)
        .inverted(true)
        .draw_value(false)
        .vexpand(true)
        .height_request(150)
        .build()
}

fn slider_value(adj: &Adjustment) -> i32 {
    adj.get_value().round() as i32
}

/// An adjustment together with the handler writing its edits
struct Bound {
    adj: Adjustment,
    handler: SignalHandlerId,
}

impl Bound {
    fn show(&self, value: i32) {
        utils::blocked(&self.adj, &self.handler, |adj| adj.set_value(f64::from(value)));
    }
}

struct PanWidgets {
    volume: Bound,
    pan: Option<Bound>,
}

impl PanView for PanWidgets {
    fn show_volume(&self, volume: i32) {
        self.volume.show(volume);
    }

    fn show_pan(&self, pan: i32) {
        if let Some(ref pan_slider) = self.pan {
            pan_slider.show(pan);
        }
    }
}

struct DualWidgets {
    left: Bound,
    right: Option<Bound>,
}

impl DualView for DualWidgets {
    fn show_left(&self, value: i32) {
        self.left.show(value);
    }

    fn show_right(&self, value: i32) {
        if let Some(ref right) = self.right {
            right.show(value);
        }
    }
}

/// Connect an adjustment to an engine callback, holding the engine weakly
fn bind<T, F>(adj: Adjustment, engine: &Rc<T>, edit: F) -> Bound
where
    T: VolumeControl + 'static,
    F: Fn(&T, i32) -> Result<(), Error> + 'static,
{
    let weak = Rc::downgrade(engine);
    let handler = adj.connect_value_changed(move |adj| {
        if let Some(engine) = weak.upgrade() {
            if let Err(e) = edit(&*engine, slider_value(adj)) {
                warn!("{}: volume write rejected: {}", engine.name(), e);
            }
        }
    });
    Bound { adj, handler }
}

/// The control, its volume widget and the widget for the pan row
type Parts = (Rc<dyn VolumeControl>, Widget, Widget);

fn pan_style(element: AlsaElement, pending: &mut PendingObservers) -> Result<Parts, Error> {
    let engine = Rc::new(PanStyle::new(element)?);
    let state = engine.state();

    let volume = bind(volume_adjustment(state.volume), &engine, PanStyle::volume_changed);
    let volume_widget = volume_scale(&volume.adj).upcast::<Widget>();

    let (pan, pan_widget) = if engine.is_mono() {
        (None, utils::blank().upcast::<Widget>())
    } else {
        let adj = Adjustment::new(f64::from(state.pan), -100.0, 101.0, 1.0, 5.0, 1.0);
        let pan = bind(adj, &engine, PanStyle::pan_changed);
        let scale = Scale::new(Orientation::Horizontal, Some(&pan.adj));
        scale.set_draw_value(false);

        let weak = Rc::downgrade(&engine);
        scale.connect_button_press_event(move |_, event| {
            if event.get_event_type() != EventType::DoubleButtonPress {
                return Inhibit(false);
            }
            if let Some(engine) = weak.upgrade() {
                if let Err(e) = engine.reset_pan() {
                    warn!("{}: could not reset pan: {}", engine.name(), e);
                }
            }
            Inhibit(true)
        });
        (Some(pan), scale.upcast::<Widget>())
    };

    engine.set_view(Rc::new(PanWidgets { volume, pan }));
    pending.add(engine.clone());
    let control: Rc<dyn VolumeControl> = engine;
    Ok((control, volume_widget, pan_widget))
}

fn dual_style(
    element: AlsaElement,
    pending: &mut PendingObservers,
    toggles: ToggleStyle,
) -> Result<Parts, Error> {
    let engine = Rc::new(DualStyle::new(element)?);
    let state = engine.state();

    let sliders = gtk::Box::new(Orientation::Horizontal, 0);
    let left = bind(volume_adjustment(state.left), &engine, DualStyle::left_changed);
    sliders.pack_start(&volume_scale(&left.adj), true, true, 0);

    let (right, lock_widget) = if engine.is_mono() {
        (None, utils::blank().upcast::<Widget>())
    } else {
        let right = bind(volume_adjustment(state.right), &engine, DualStyle::right_changed);
        sliders.pack_start(&volume_scale(&right.adj), true, true, 0);

        let lock = utils::toggle_button("Lock", toggles);
        lock.set_active(state.locked);
        let weak = Rc::downgrade(&engine);
        lock.connect_toggled(move |b| {
            if let Some(engine) = weak.upgrade() {
                engine.set_locked(b.get_active());
            }
        });
        (Some(right), lock.upcast::<Widget>())
    };

    engine.set_view(Rc::new(DualWidgets { left, right }));
    pending.add(engine.clone());
    let control: Rc<dyn VolumeControl> = engine;
    Ok((control, sliders.upcast::<Widget>(), lock_widget))
}

/// One column on a mixer page: label, volume, pan or lock, mute and capture
pub(super) struct Slider {
    control: Rc<dyn VolumeControl>,
    config_name: String,
    widget: gtk::Box,
}

impl Slider {
    /// Build the whole column, then register its controls with `session`
    pub fn new(
        session: &MixerSession,
        element: AlsaElement,
        style: SliderStyle,
        toggles: ToggleStyle,
        groups: &SizeGroups,
    ) -> Result<Self, Error> {
        let name = element.name().to_owned();
        let has_mute = element.has_switch(Direction::Playback);
        let has_capture = element.has_switch(Direction::Capture);

        let mut pending = PendingObservers::default();
        let (control, volume, pan) = match style {
            SliderStyle::Pan => pan_style(element.clone(), &mut pending)?,
            SliderStyle::Dual => dual_style(element.clone(), &mut pending, toggles)?,
        };

        let column = gtk::Box::new(Orientation::Vertical, 0);
        let label = Label::new(Some(&utils::short_name(&name)));
        label.set_tooltip_text(Some(&name));
        column.pack_start(&label, false, true, 0);
        column.pack_start(&volume, true, true, 0);
        column.pack_start(&pan, false, false, 0);
        groups.pan.add_widget(&pan);

        let mute = if has_mute {
            toggle::bind(&mut pending, element.clone(), SwitchRole::Mute, "Mute", toggles)?
                .upcast::<Widget>()
        } else {
            utils::blank().upcast::<Widget>()
        };
        column.pack_start(&mute, false, false, 0);
        groups.mute.add_widget(&mute);

        let capture = if has_capture {
            toggle::bind(&mut pending, element, SwitchRole::Capture, "Rec.", toggles)?
                .upcast::<Widget>()
        } else {
            utils::blank().upcast::<Widget>()
        };
        column.pack_start(&capture, false, false, 0);
        groups.capture.add_widget(&capture);

        let widget = gtk::Box::new(Orientation::Horizontal, 0);
        widget.pack_start(&column, true, true, 0);
        widget.pack_start(&Separator::new(Orientation::Vertical), false, true, 0);

        session.register_all(pending);
        Ok(Self {
            config_name: config_name(control.name()),
            control,
            widget,
        })
    }

    pub fn name(&self) -> &str {
        self.control.name()
    }

    pub fn config_name(&self) -> &str {
        &self.config_name
    }

    pub fn widget(&self) -> &gtk::Box {
        &self.widget
    }
}
