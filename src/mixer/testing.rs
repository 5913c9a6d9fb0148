//! In-memory mixer element for unit tests

use super::{Channel, Direction, Element, MilliBel, Rounding, Volume};
use crate::error::Error;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

struct Inner {
    name: String,
    mono: bool,
    volume: Option<Direction>,
    switches: (bool, bool),
    range: (Volume, Volume),
    db: Option<(MilliBel, MilliBel)>,
    /// Raw values, or dB values when `db` is set
    levels: RefCell<[i64; 2]>,
    playback_switch: Cell<bool>,
    capture_switch: Cell<bool>,
    writes: Cell<usize>,
    reject_writes: Cell<bool>,
}

/// A shared handle, clones observe the same element
#[derive(Clone)]
pub(crate) struct FakeElement(Rc<Inner>);

impl FakeElement {
    fn build(name: &str, mono: bool, volume: Option<Direction>, range: (Volume, Volume)) -> Self {
        Self(Rc::new(Inner {
            name: name.to_owned(),
            mono,
            volume,
            switches: (false, false),
            range,
            db: None,
            levels: RefCell::new([range.0, range.0]),
            playback_switch: Cell::new(false),
            capture_switch: Cell::new(false),
            writes: Cell::new(0),
            reject_writes: Cell::new(false),
        }))
    }

    pub(crate) fn stereo(name: &str, range: (Volume, Volume)) -> Self {
        Self::build(name, false, Some(Direction::Playback), range)
    }

    pub(crate) fn mono(name: &str, range: (Volume, Volume)) -> Self {
        Self::build(name, true, Some(Direction::Playback), range)
    }

    pub(crate) fn capture(name: &str, range: (Volume, Volume)) -> Self {
        Self::build(name, false, Some(Direction::Capture), range)
    }

    /// An element with switches only
    pub(crate) fn switch_only(name: &str) -> Self {
        Self::build(name, true, None, (0, 0))
    }

    fn inner_mut(self) -> Inner {
        match Rc::try_unwrap(self.0) {
            Ok(inner) => inner,
            Err(_) => panic!("configure the fake before cloning it"),
        }
    }

    pub(crate) fn with_db(self, db: (MilliBel, MilliBel)) -> Self {
        let mut inner = self.inner_mut();
        inner.db = Some(db);
        inner.levels = RefCell::new([db.0, db.0]);
        Self(Rc::new(inner))
    }

    pub(crate) fn with_switches(self, playback: bool, capture: bool) -> Self {
        let mut inner = self.inner_mut();
        inner.switches = (playback, capture);
        Self(Rc::new(inner))
    }

    /// Change the levels behind our back, like another application would
    pub(crate) fn set_levels(&self, left: i64, right: i64) {
        *self.0.levels.borrow_mut() = [left, right];
    }

    pub(crate) fn levels(&self) -> (i64, i64) {
        let levels = self.0.levels.borrow();
        (levels[0], levels[1])
    }

    pub(crate) fn set_switch_state(&self, dir: Direction, on: bool) {
        match dir {
            Direction::Playback => self.0.playback_switch.set(on),
            Direction::Capture => self.0.capture_switch.set(on),
        }
    }

    pub(crate) fn writes(&self) -> usize {
        self.0.writes.get()
    }

    pub(crate) fn reject_writes(&self, reject: bool) {
        self.0.reject_writes.set(reject);
    }

    fn write(&self) -> Result<(), Error> {
        self.0.writes.set(self.0.writes.get() + 1);
        if self.0.reject_writes.get() {
            Err(Error::ElementGone(self.0.name.clone()))
        } else {
            Ok(())
        }
    }

    fn slot(ch: Channel) -> usize {
        match ch {
            Channel::FrontLeft => 0,
            Channel::FrontRight => 1,
        }
    }

    fn store(&self, ch: Channel, value: i64, (min, max): (i64, i64)) -> Result<(), Error> {
        self.write()?;
        self.0.levels.borrow_mut()[Self::slot(ch)] = value.max(min).min(max);
        Ok(())
    }
}

impl Element for FakeElement {
    fn name(&self) -> &str {
        &self.0.name
    }

    fn is_enumerated(&self) -> bool {
        false
    }

    fn is_mono(&self) -> bool {
        self.0.mono
    }

    fn has_volume(&self, dir: Direction) -> bool {
        self.0.volume == Some(dir)
    }

    fn has_switch(&self, dir: Direction) -> bool {
        match dir {
            Direction::Playback => self.0.switches.0,
            Direction::Capture => self.0.switches.1,
        }
    }

    fn volume_range(&self, _dir: Direction) -> (Volume, Volume) {
        self.0.range
    }

    fn db_range(&self, _dir: Direction) -> Option<(MilliBel, MilliBel)> {
        self.0.db
    }

    fn raw_volume(&self, _dir: Direction, ch: Channel) -> Result<Volume, Error> {
        Ok(self.0.levels.borrow()[Self::slot(ch)])
    }

    fn set_raw_volume(&self, _dir: Direction, ch: Channel, value: Volume) -> Result<(), Error> {
        self.store(ch, value, self.0.range)
    }

    fn db_volume(&self, _dir: Direction, ch: Channel) -> Result<MilliBel, Error> {
        Ok(self.0.levels.borrow()[Self::slot(ch)])
    }

    fn set_db_volume(
        &self,
        _dir: Direction,
        ch: Channel,
        value: MilliBel,
        _rounding: Rounding,
    ) -> Result<(), Error> {
        let range = self.0.db.unwrap_or(self.0.range);
        self.store(ch, value, range)
    }

    fn switch(&self, dir: Direction, _ch: Channel) -> Result<bool, Error> {
        Ok(match dir {
            Direction::Playback => self.0.playback_switch.get(),
            Direction::Capture => self.0.capture_switch.get(),
        })
    }

    fn set_switch_all(&self, dir: Direction, on: bool) -> Result<(), Error> {
        self.write()?;
        self.set_switch_state(dir, on);
        Ok(())
    }
}
