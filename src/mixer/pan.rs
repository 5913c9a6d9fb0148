//! One volume slider plus one pan slider per element.

use super::{require_volume, Channel, Element, Refresh, Refreshing, Rounding, VolumeControl};
use crate::error::Error;

use tracing::warn;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// What the pan-style sliders currently show
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SliderState {
    /// 0..=100, the louder of the two channels
    pub volume: i32,
    /// -100..=100, always 0 for mono elements
    pub pan: i32,
}

/// The widgets a [`PanStyle`] pushes refreshed values into
pub trait PanView {
    fn show_volume(&self, volume: i32);
    fn show_pan(&self, pan: i32);
}

fn percent(normalized: f64) -> i32 {
    ((normalized * 100.0).round() as i32).max(0).min(100)
}

/// Perceptual volume of an element: the louder channel, 0..=100
pub fn get_volume<E: Element + ?Sized>(element: &E) -> Result<i32, Error> {
    let left = element.normalized_volume(Channel::FrontLeft)?;
    let loudest = if element.is_mono() {
        left
    } else {
        left.max(element.normalized_volume(Channel::FrontRight)?)
    };
    Ok(percent(loudest))
}

/// Balance of a stereo element, relative to its louder channel
///
/// Negative values mean the right channel is the quieter one.
pub fn get_pan<E: Element + ?Sized>(element: &E, volume: i32) -> Result<i32, Error> {
    if element.is_mono() {
        return Ok(0);
    }

    let left = element.normalized_volume(Channel::FrontLeft)?;
    let right = element.normalized_volume(Channel::FrontRight)?;
    if volume == 0 || left == right {
        return Ok(0);
    }

    let pan = ((right - left) / left.max(right) * 100.0).round() as i32;
    Ok(pan.max(-100).min(100))
}

/// Per-channel slider values for a volume and pan position
///
/// Pan only ever takes away from one side: a negative pan lowers the
/// right channel, a positive one lowers the left.
pub fn split(volume: i32, pan: i32, mono: bool) -> (i32, i32) {
    let volume = volume.max(0).min(100);
    let pan = pan.max(-100).min(100);
    let (mut left, mut right) = (volume, volume);

    if !mono {
        if pan < 0 {
            let l = f64::from(left);
            right = (l - (f64::from(pan.abs()) / 100.0) * l).round() as i32;
        } else if pan > 0 {
            let r = f64::from(right);
            left = (r - (f64::from(pan) / 100.0) * r).round() as i32;
        }
    }

    (left, right)
}

/// Write a volume and pan position to the element
pub fn set_volume<E: Element + ?Sized>(volume: i32, pan: i32, element: &E) -> Result<(), Error> {
    let mono = element.is_mono();
    let (left, right) = split(volume, pan, mono);

    element.set_normalized_volume(Channel::FrontLeft, f64::from(left) / 100.0, Rounding::Nearest)?;
    if !mono {
        element.set_normalized_volume(
            Channel::FrontRight,
            f64::from(right) / 100.0,
            Rounding::Nearest,
        )?;
    }
    Ok(())
}

/// Pan-style slider engine for one element
pub struct PanStyle<E> {
    element: E,
    state: Cell<SliderState>,
    refreshing: Cell<bool>,
    view: RefCell<Option<Rc<dyn PanView>>>,
}

impl<E: Element> PanStyle<E> {
    /// Bind an element, reading its current position
    ///
    /// Elements without a playback or capture volume are rejected.
    pub fn new(element: E) -> Result<Self, Error> {
        require_volume(&element)?;
        let this = Self {
            element,
            state: Cell::new(SliderState::default()),
            refreshing: Cell::new(false),
            view: RefCell::new(None),
        };
        this.state.set(this.read()?);
        Ok(this)
    }

    pub fn set_view(&self, view: Rc<dyn PanView>) {
        *self.view.borrow_mut() = Some(view);
    }

    pub fn state(&self) -> SliderState {
        self.state.get()
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    fn read(&self) -> Result<SliderState, Error> {
        let volume = get_volume(&self.element)?;
        let pan = get_pan(&self.element, volume)?;
        Ok(SliderState { volume, pan })
    }

    /// Write `state` to the element
    ///
    /// A rejected write puts the sliders back where the device still is.
    fn commit(&self, state: SliderState) -> Result<(), Error> {
        match set_volume(state.volume, state.pan, &self.element) {
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

    /// The user moved the volume slider
    pub fn volume_changed(&self, volume: i32) -> Result<(), Error> {
        if self.refreshing.get() {
            return Ok(());
        }
        let state = SliderState {
            volume: volume.max(0).min(100),
            ..self.state.get()
        };
        self.commit(state)
    }

    /// The user moved the pan slider
    pub fn pan_changed(&self, pan: i32) -> Result<(), Error> {
        if self.refreshing.get() || self.element.is_mono() {
            return Ok(());
        }
        let state = SliderState {
            pan: pan.max(-100).min(100),
            ..self.state.get()
        };
        self.commit(state)
    }

    /// Centre the pan slider and re-apply the volume
    pub fn reset_pan(&self) -> Result<(), Error> {
        let state = SliderState {
            pan: 0,
            ..self.state.get()
        };

        if let Some(view) = self.view.borrow().as_ref() {
            let _guard = Refreshing::enter(&self.refreshing);
            view.show_pan(0);
        }
        self.commit(state)
    }
}

impl<E: Element> Refresh for PanStyle<E> {
    fn refresh(&self) -> Result<(), Error> {
        let _guard = Refreshing::enter(&self.refreshing);
        let state = self.read()?;
        self.state.set(state);

        if let Some(view) = self.view.borrow().as_ref() {
            view.show_volume(state.volume);
            if !self.element.is_mono() {
                view.show_pan(state.pan);
            }
        }
        Ok(())
    }
}

impl<E: Element> VolumeControl for PanStyle<E> {
    fn name(&self) -> &str {
        self.element.name()
    }

    fn is_mono(&self) -> bool {
        self.element.is_mono()
    }
}
