use super::{Channel, Direction, Element, Refresh, Refreshing};
use crate::error::Error;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// What a toggle on screen means for the element switch behind it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchRole {
    /// Playback switch, shown inverted: active means muted
    Mute,
    /// Capture switch ("Rec.")
    Capture,
    /// A switch-only element
    Plain,
}

pub trait SwitchView {
    fn show(&self, active: bool);
}

pub struct Switch<E> {
    element: E,
    direction: Direction,
    inverted: bool,
    refreshing: Cell<bool>,
    view: RefCell<Option<Rc<dyn SwitchView>>>,
}

impl<E: Element> Switch<E> {
    pub fn new(element: E, role: SwitchRole) -> Result<Self, Error> {
        let (direction, inverted) = match role {
            SwitchRole::Mute => (Direction::Playback, true),
            SwitchRole::Capture => (Direction::Capture, false),
            SwitchRole::Plain if element.has_switch(Direction::Playback) => {
                (Direction::Playback, false)
            }
            SwitchRole::Plain => (Direction::Capture, false),
        };

        if !element.has_switch(direction) {
            return Err(Error::Unsupported(element.name().to_owned()));
        }

        Ok(Self {
            element,
            direction,
            inverted,
            refreshing: Cell::new(false),
            view: RefCell::new(None),
        })
    }

    pub fn set_view(&self, view: Rc<dyn SwitchView>) {
        *self.view.borrow_mut() = Some(view);
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    /// Whether the toggle should currently be shown active
    pub fn state(&self) -> Result<bool, Error> {
        let on = self.element.switch(self.direction, Channel::FrontLeft)?;
        Ok(on != self.inverted)
    }

    fn show(&self, active: bool) {
        if let Some(view) = self.view.borrow().as_ref() {
            let _guard = Refreshing::enter(&self.refreshing);
            view.show(active);
        }
    }

    /// The user flipped the toggle
    ///
    /// A rejected write puts the toggle back where the device still is.
    pub fn toggled(&self, requested: bool) -> Result<(), Error> {
        if self.refreshing.get() {
            return Ok(());
        }

        let current = self.state()?;
        if current == requested {
            return Ok(());
        }

        let result = self
            .element
            .set_switch_all(self.direction, requested != self.inverted);
        if result.is_err() {
            self.show(current);
        }
        result
    }
}

impl<E: Element> Refresh for Switch<E> {
    fn refresh(&self) -> Result<(), Error> {
        let active = self.state()?;
        self.show(active);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixer::testing::FakeElement;

    #[derive(Default)]
    struct Recorder {
        shown: RefCell<Vec<bool>>,
    }

    impl SwitchView for Recorder {
        fn show(&self, active: bool) {
            self.shown.borrow_mut().push(active);
        }
    }

    fn master() -> FakeElement {
        FakeElement::stereo("Master", (0, 100)).with_switches(true, false)
    }

    #[test]
    fn mute_is_inverted() {
        let elem = master();
        let mute = Switch::new(elem.clone(), SwitchRole::Mute).unwrap();

        elem.set_switch_state(Direction::Playback, true);
        assert_eq!(mute.state().unwrap(), false);

        mute.toggled(true).unwrap();
        assert_eq!(elem.switch(Direction::Playback, Channel::FrontLeft).unwrap(), false);
    }

    #[test]
    fn capture_is_direct() {
        let elem = FakeElement::capture("Capture", (0, 63)).with_switches(false, true);
        let rec = Switch::new(elem.clone(), SwitchRole::Capture).unwrap();

        rec.toggled(true).unwrap();
        assert!(elem.switch(Direction::Capture, Channel::FrontLeft).unwrap());
        assert!(rec.state().unwrap());
    }

    #[test]
    fn plain_falls_back_to_capture() {
        let elem = FakeElement::switch_only("Input Source").with_switches(false, true);
        let switch = Switch::new(elem.clone(), SwitchRole::Plain).unwrap();
        switch.toggled(true).unwrap();
        assert!(elem.switch(Direction::Capture, Channel::FrontLeft).unwrap());
    }

    #[test]
    fn missing_switch_is_unsupported() {
        let elem = FakeElement::switch_only("Nothing");
        assert!(matches!(
            Switch::new(elem.clone(), SwitchRole::Plain),
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(
            Switch::new(master(), SwitchRole::Capture),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn unchanged_toggle_does_not_write() {
        let elem = master();
        let mute = Switch::new(elem.clone(), SwitchRole::Mute).unwrap();
        elem.set_switch_state(Direction::Playback, true);

        mute.toggled(false).unwrap();
        assert_eq!(elem.writes(), 0);
    }

    #[test]
    fn rejected_write_rolls_back() {
        let elem = master();
        let mute = Switch::new(elem.clone(), SwitchRole::Mute).unwrap();
        let view = Rc::new(Recorder::default());
        mute.set_view(view.clone());

        elem.set_switch_state(Direction::Playback, true);
        elem.reject_writes(true);
        assert!(mute.toggled(true).is_err());
        assert_eq!(*view.shown.borrow(), vec![false]);
        assert_eq!(mute.state().unwrap(), false);
    }

    #[test]
    fn refresh_shows_device_state() {
        let elem = master();
        let mute = Switch::new(elem.clone(), SwitchRole::Mute).unwrap();
        let view = Rc::new(Recorder::default());
        mute.set_view(view.clone());

        elem.set_switch_state(Direction::Playback, false);
        mute.refresh().unwrap();
        assert_eq!(*view.shown.borrow(), vec![true]);
        assert_eq!(elem.writes(), 0);
    }
}
