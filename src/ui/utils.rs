use crate::settings::ToggleStyle;
use glib::{object::IsA, Cast, ObjectExt, SignalHandlerId};
use gtk::{
    prelude::*, Adjustment, Align, CheckButton, Label, ScrolledWindow, ToggleButton, Viewport,
    Widget,
};

/// Slider labels show at most this many characters of an element name
const LABEL_CHARS: usize = 8;

pub(super) fn margin<P: IsA<Widget>>(widget: &P, px: i32) {
    widget.set_margin_top(px);
    widget.set_margin_start(px);
    widget.set_margin_bottom(px);
    widget.set_margin_end(px);
}

pub(super) fn wrap_scroll<P: IsA<Widget>>(widget: &P) -> ScrolledWindow {
    let vp = Viewport::new::<Adjustment, Adjustment>(None, None);
    vp.add(widget);
    vp.set_shadow_type(gtk::ShadowType::None);
    let sw = ScrolledWindow::new::<Adjustment, Adjustment>(None, None);
    sw.add(&vp);
    sw.set_shadow_type(gtk::ShadowType::EtchedIn);
    sw
}

pub(super) fn mixer_label(text: &str, vertical: bool) -> Label {
    let l = Label::new(Some(text));
    margin(&l, 5);
    if vertical {
        l.set_angle(90.0);
        l.set_valign(Align::End);
    } else {
        l.set_halign(Align::Center);
    }
    l
}

/// An empty label holding the place of a missing widget
pub(super) fn blank() -> Label {
    Label::new(None)
}

pub(super) fn short_name(name: &str) -> String {
    name.chars().take(LABEL_CHARS).collect()
}

pub(super) fn toggle_button(label: &str, style: ToggleStyle) -> ToggleButton {
    let button = match style {
        ToggleStyle::Toggle => ToggleButton::with_label(label),
        ToggleStyle::Check => CheckButton::with_label(label).upcast(),
    };
    button.set_halign(Align::Center);
    button
}

/// Run `f` with `handler` blocked, so programmatic changes are not
/// mistaken for user edits
pub(super) fn blocked<O: ObjectExt>(object: &O, handler: &SignalHandlerId, f: impl FnOnce(&O)) {
    object.block_signal(handler);
    f(object);
    object.unblock_signal(handler);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names_keep_eight_characters() {
        assert_eq!(short_name("Master"), "Master");
        assert_eq!(short_name("Headphone Mic Boost"), "Headphon");
        assert_eq!(short_name("Lautstärke"), "Lautstär");
    }
}
