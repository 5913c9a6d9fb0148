//! One slider per channel, optionally locked together.

use super::volume_mapping::round_dir;
use super::{require_volume, Channel, Element, Refresh, Refreshing, Rounding, VolumeControl};
use crate::error::Error;

use tracing::warn;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Slider position of a single channel, 0..=100
pub fn get_channel_volume<E: Element + ?Sized>(element: &E, ch: Channel) -> Result<i32, Error> {
    let normalized = element.normalized_volume(ch)?;
    Ok(round_dir(normalized * 100.0, Rounding::Ceil) as i32)
}

/// Write a slider position to one channel only
pub fn set_channel_volume<E: Element + ?Sized>(
    value: i32,
    element: &E,
    ch: Channel,
) -> Result<(), Error> {
    let value = value.max(0).min(100);
    element.set_normalized_volume(ch, f64::from(value) / 100.0, Rounding::Ceil)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DualState {
    pub left: i32,
    pub right: i32,
    /// `left - right`, held constant while locked
    pub pan: i32,
    pub locked: bool,
}

impl Default for DualState {
    fn default() -> Self {
        Self {
            left: 0,
            right: 0,
            pan: 0,
            locked: true,
        }
    }
}

pub trait DualView {
    fn show_left(&self, value: i32);
    fn show_right(&self, value: i32);
}

fn clamp(value: i32) -> i32 {
    value.max(0).min(100)
}

/// Dual-slider engine for one element
pub struct DualStyle<E> {
    element: E,
    state: Cell<DualState>,
    refreshing: Cell<bool>,
    view: RefCell<Option<Rc<dyn DualView>>>,
}

impl<E: Element> DualStyle<E> {
    pub fn new(element: E) -> Result<Self, Error> {
        require_volume(&element)?;
        let this = Self {
            element,
            state: Cell::new(DualState::default()),
            refreshing: Cell::new(false),
            view: RefCell::new(None),
        };
        let (left, right) = this.read()?;
        this.state.set(DualState {
            left,
            right,
            pan: left - right,
            ..DualState::default()
        });
        Ok(this)
    }

    pub fn set_view(&self, view: Rc<dyn DualView>) {
        *self.view.borrow_mut() = Some(view);
    }

    pub fn state(&self) -> DualState {
        self.state.get()
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    fn read(&self) -> Result<(i32, i32), Error> {
        let left = get_channel_volume(&self.element, Channel::FrontLeft)?;
        if self.element.is_mono() {
            return Ok((left, left));
        }
        let right = get_channel_volume(&self.element, Channel::FrontRight)?;
        Ok((left, right))
    }

    /// Lock or unlock the two sliders
    ///
    /// Locking captures the current distance between them.
    pub fn set_locked(&self, locked: bool) {
        let mut state = self.state.get();
        if locked && !state.locked {
            state.pan = state.left - state.right;
        }
        state.locked = locked;
        self.state.set(state);
    }

    pub fn locked(&self) -> bool {
        self.state.get().locked
    }

    /// The user moved the left (or only) slider
    pub fn left_changed(&self, value: i32) -> Result<(), Error> {
        if self.refreshing.get() {
            return Ok(());
        }
        let mut state = self.state.get();
        state.left = clamp(value);

        if self.element.is_mono() {
            state.right = state.left;
            return self.commit(state, Channel::FrontLeft);
        }

        if state.locked {
            state.right = clamp(state.left - state.pan);
            self.mirror(|view| view.show_right(state.right));
        }
        self.commit(state, Channel::FrontLeft)
    }

    /// The user moved the right slider
    pub fn right_changed(&self, value: i32) -> Result<(), Error> {
        if self.refreshing.get() || self.element.is_mono() {
            return Ok(());
        }
        let mut state = self.state.get();
        state.right = clamp(value);

        if state.locked {
            state.left = clamp(state.right + state.pan);
            self.mirror(|view| view.show_left(state.left));
        }
        self.commit(state, Channel::FrontRight)
    }

    fn mirror<F: FnOnce(&dyn DualView)>(&self, f: F) {
        if let Some(view) = self.view.borrow().as_ref() {
            let _guard = Refreshing::enter(&self.refreshing);
            f(view.as_ref());
        }
    }

    /// Write the edited channel, then its partner when locked
    ///
    /// A rejected write puts both sliders back where the device still is.
    fn commit(&self, mut state: DualState, edited: Channel) -> Result<(), Error> {
        state.pan = state.left - state.right;
        match self.write(state, edited) {
            Ok(()) => {
                self.state.set(state);
                Ok(())
            }
            Err(e) => {
                if let Err(reread) = self.refresh() {
                    warn!("{}: could not re-read volume: {}", self.element.name(), reread);
                }
                Err(e)
            }
        }
    }

    fn write(&self, state: DualState, edited: Channel) -> Result<(), Error> {
        let (first, second) = match edited {
            Channel::FrontLeft => ((state.left, Channel::FrontLeft), (state.right, Channel::FrontRight)),
            Channel::FrontRight => ((state.right, Channel::FrontRight), (state.left, Channel::FrontLeft)),
        };

        set_channel_volume(first.0, &self.element, first.1)?;
        if state.locked && !self.element.is_mono() {
            set_channel_volume(second.0, &self.element, second.1)?;
        }
        Ok(())
    }
}

impl<E: Element> Refresh for DualStyle<E> {
    fn refresh(&self) -> Result<(), Error> {
        let _guard = Refreshing::enter(&self.refreshing);
        let (left, right) = self.read()?;
        let state = DualState {
            left,
            right,
            pan: left - right,
            ..self.state.get()
        };
        self.state.set(state);

        if let Some(view) = self.view.borrow().as_ref() {
            view.show_left(left);
            if !self.element.is_mono() {
                view.show_right(right);
            }
        }
        Ok(())
    }
}

impl<E: Element> VolumeControl for DualStyle<E> {
    fn name(&self) -> &str {
        self.element.name()
    }

    fn is_mono(&self) -> bool {
        self.element.is_mono()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixer::testing::FakeElement;
    use proptest::prelude::*;
    use std::rc::Weak;

    struct EchoView {
        engine: RefCell<Weak<DualStyle<FakeElement>>>,
        shown: RefCell<Vec<(char, i32)>>,
    }

    impl EchoView {
        fn attach(engine: &Rc<DualStyle<FakeElement>>) -> Rc<Self> {
            let view = Rc::new(Self {
                engine: RefCell::new(Rc::downgrade(engine)),
                shown: RefCell::new(Vec::new()),
            });
            engine.set_view(view.clone());
            view
        }

        fn engine(&self) -> Rc<DualStyle<FakeElement>> {
            self.engine.borrow().upgrade().unwrap()
        }
    }

    impl DualView for EchoView {
        fn show_left(&self, value: i32) {
            self.shown.borrow_mut().push(('l', value));
            self.engine().left_changed(value).unwrap();
        }

        fn show_right(&self, value: i32) {
            self.shown.borrow_mut().push(('r', value));
            self.engine().right_changed(value).unwrap();
        }
    }

    fn stereo_at(left: i64, right: i64) -> (FakeElement, Rc<DualStyle<FakeElement>>) {
        let elem = FakeElement::stereo("Headphone", (0, 100));
        elem.set_levels(left, right);
        let engine = Rc::new(DualStyle::new(elem.clone()).unwrap());
        (elem, engine)
    }

    #[test]
    fn channel_volume_rounds_up() {
        let elem = FakeElement::stereo("Headphone", (0, 1000));
        elem.set_levels(601, 70);
        assert_eq!(get_channel_volume(&elem, Channel::FrontLeft).unwrap(), 61);
        // exactly 7%, which is 7.000000000000001 before absorbing the noise
        assert_eq!(get_channel_volume(&elem, Channel::FrontRight).unwrap(), 7);
    }

    #[test]
    fn set_channel_volume_touches_one_channel() {
        let elem = FakeElement::stereo("Headphone", (0, 100));
        set_channel_volume(35, &elem, Channel::FrontRight).unwrap();
        assert_eq!(elem.levels(), (0, 35));
        assert_eq!(elem.writes(), 1);
    }

    #[test]
    fn starts_locked_with_captured_pan() {
        let (_, engine) = stereo_at(60, 40);
        assert_eq!(
            engine.state(),
            DualState {
                left: 60,
                right: 40,
                pan: 20,
                locked: true
            }
        );
    }

    #[test]
    fn locked_edit_mirrors_the_partner() {
        let (elem, engine) = stereo_at(60, 40);
        let view = EchoView::attach(&engine);

        engine.left_changed(80).unwrap();
        assert_eq!(elem.levels(), (80, 60));
        assert_eq!(*view.shown.borrow(), vec![('r', 60)]);
        assert_eq!(elem.writes(), 2);

        engine.right_changed(10).unwrap();
        assert_eq!(elem.levels(), (30, 10));
        assert_eq!(engine.state().pan, 20);
    }

    #[test]
    fn unlocked_channels_are_independent() {
        let (elem, engine) = stereo_at(60, 40);
        engine.set_locked(false);

        engine.left_changed(30).unwrap();
        assert_eq!(elem.levels(), (30, 40));
        assert_eq!(elem.writes(), 1);
        assert_eq!(engine.state().pan, -10);

        engine.set_locked(true);
        engine.right_changed(50).unwrap();
        assert_eq!(elem.levels(), (40, 50));
    }

    #[test]
    fn clamped_mirror_recaptures_pan() {
        let (elem, engine) = stereo_at(60, 40);
        engine.left_changed(10).unwrap();
        assert_eq!(elem.levels(), (10, 0));
        assert_eq!(engine.state().pan, 10);
    }

    #[test]
    fn mono_has_one_slider() {
        let elem = FakeElement::mono("Beep", (0, 100));
        let engine = DualStyle::new(elem.clone()).unwrap();

        engine.left_changed(45).unwrap();
        assert_eq!(elem.levels().0, 45);
        assert_eq!(elem.writes(), 1);

        engine.right_changed(90).unwrap();
        assert_eq!(elem.writes(), 1);
        assert_eq!(engine.state().pan, 0);
    }

    #[test]
    fn refresh_does_not_write_back() {
        let (elem, engine) = stereo_at(60, 40);
        let view = EchoView::attach(&engine);

        elem.set_levels(25, 75);
        engine.refresh().unwrap();
        assert_eq!(elem.writes(), 0);
        assert_eq!(*view.shown.borrow(), vec![('l', 25), ('r', 75)]);
        assert_eq!(engine.state().pan, -50);
        assert!(engine.locked());
    }

    #[test]
    fn rejected_write_shows_the_device_again() {
        let (elem, engine) = stereo_at(60, 40);
        let view = EchoView::attach(&engine);

        elem.reject_writes(true);
        assert!(engine.left_changed(90).is_err());
        assert_eq!(elem.levels(), (60, 40));
        assert_eq!(
            engine.state(),
            DualState {
                left: 60,
                right: 40,
                pan: 20,
                locked: true
            }
        );
        // the mirrored 70 is taken back along with the left slider
        assert_eq!(*view.shown.borrow(), vec![('r', 70), ('l', 60), ('r', 40)]);

        elem.reject_writes(false);
        engine.right_changed(30).unwrap();
        assert_eq!(elem.levels(), (50, 30));
    }

    #[test]
    fn rejected_mono_write_keeps_the_old_level() {
        let elem = FakeElement::mono("Beep", (0, 100));
        elem.set_levels(45, 45);
        let engine = DualStyle::new(elem.clone()).unwrap();

        elem.reject_writes(true);
        assert!(engine.left_changed(10).is_err());
        assert_eq!(engine.state().left, 45);
        assert_eq!(engine.state().pan, 0);
    }

    #[derive(Clone, Debug)]
    enum Edit {
        Left(i32),
        Right(i32),
    }

    fn edits() -> impl Strategy<Value = Vec<Edit>> {
        prop::collection::vec(
            prop_oneof![
                (20i32..=100).prop_map(Edit::Left),
                (0i32..=80).prop_map(Edit::Right),
            ],
            1..20,
        )
    }

    proptest! {
        #[test]
        fn locked_distance_is_kept(edits in edits()) {
            let (elem, engine) = stereo_at(60, 40);
            let _view = EchoView::attach(&engine);

            for edit in edits {
                match edit {
                    Edit::Left(v) => engine.left_changed(v).unwrap(),
                    Edit::Right(v) => engine.right_changed(v).unwrap(),
                }
                let (left, right) = elem.levels();
                prop_assert_eq!(left - right, 20);
                prop_assert_eq!(engine.state().pan, 20);
            }
        }
    }
}
