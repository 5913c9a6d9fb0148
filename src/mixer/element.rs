use super::{volume_mapping, MilliBel, Volume};
use crate::error::Error;

use alsa::mixer::{MilliBel as AlsaMilliBel, Mixer, Selem, SelemChannelId, SelemId};
use alsa::Round;

use std::rc::Rc;

/// The channels gamix drives; mono elements only use `FrontLeft`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    FrontLeft,
    FrontRight,
}

impl Channel {
    fn selem_id(self) -> SelemChannelId {
        match self {
            Channel::FrontLeft => SelemChannelId::FrontLeft,
            Channel::FrontRight => SelemChannelId::FrontRight,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Playback,
    Capture,
}

/// How a fractional device value is brought back to an integer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    /// For dB writes: the raw step whose dB value is closest, ties going down
    Nearest,
    Floor,
    Ceil,
}

impl Rounding {
    /// ALSA only rounds dB writes up or down. `Nearest` lands on the step
    /// below first and may move up one step afterwards.
    fn alsa(self) -> Round {
        match self {
            Rounding::Ceil => Round::Ceil,
            Rounding::Nearest | Rounding::Floor => Round::Floor,
        }
    }
}

/// Of two neighbouring raw steps `(raw, dB)`, the one closer to `target`
fn nearest_step(target: MilliBel, below: (Volume, MilliBel), above: (Volume, MilliBel)) -> Volume {
    if (above.1 - target).abs() < (target - below.1).abs() {
        above.0
    } else {
        below.0
    }
}

/// A single named mixer control exposed by a sound card
///
/// The values behind an element change at any time (other applications,
/// hardware buttons), so implementations must read the device on every
/// call and never hand out cached values.
pub trait Element {
    fn name(&self) -> &str;
    fn is_enumerated(&self) -> bool;
    fn is_mono(&self) -> bool;

    fn has_volume(&self, dir: Direction) -> bool;
    fn has_switch(&self, dir: Direction) -> bool;

    /// Raw device range `(min, max)`
    fn volume_range(&self, dir: Direction) -> (Volume, Volume);
    /// dB range in hundredths of a dB, `None` when the element has no dB information
    fn db_range(&self, dir: Direction) -> Option<(MilliBel, MilliBel)>;

    fn raw_volume(&self, dir: Direction, ch: Channel) -> Result<Volume, Error>;
    fn set_raw_volume(&self, dir: Direction, ch: Channel, value: Volume) -> Result<(), Error>;
    fn db_volume(&self, dir: Direction, ch: Channel) -> Result<MilliBel, Error>;
    fn set_db_volume(
        &self,
        dir: Direction,
        ch: Channel,
        value: MilliBel,
        rounding: Rounding,
    ) -> Result<(), Error>;

    fn switch(&self, dir: Direction, ch: Channel) -> Result<bool, Error>;
    fn set_switch_all(&self, dir: Direction, on: bool) -> Result<(), Error>;

    /// The direction whose volume this element's sliders drive
    ///
    /// Playback wins when the element has both.
    fn volume_direction(&self) -> Result<Direction, Error> {
        if self.has_volume(Direction::Playback) {
            Ok(Direction::Playback)
        } else if self.has_volume(Direction::Capture) {
            Ok(Direction::Capture)
        } else {
            Err(Error::Unsupported(self.name().to_owned()))
        }
    }

    /// Volume of a channel mapped into `[0, 1]`
    fn normalized_volume(&self, ch: Channel) -> Result<f64, Error> {
        let dir = self.volume_direction()?;
        volume_mapping::get_normalized(self, dir, ch)
    }

    fn set_normalized_volume(&self, ch: Channel, value: f64, rounding: Rounding) -> Result<(), Error> {
        let dir = self.volume_direction()?;
        volume_mapping::set_normalized(self, dir, ch, value, rounding)
    }
}

/// An element on a loaded ALSA mixer, addressed by name and index
///
/// Every call resolves the element again, the handle itself keeps no
/// element state.
#[derive(Clone)]
pub struct AlsaElement {
    mixer: Rc<Mixer>,
    name: String,
    index: u32,
}

impl AlsaElement {
    pub(super) fn new(mixer: Rc<Mixer>, selem: &Selem) -> Result<Self, Error> {
        let id = selem.get_id();
        let name = id.get_name()?.to_owned();
        let index = id.get_index();
        Ok(Self { mixer, name, index })
    }

    fn with_selem<T, F>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&Selem) -> alsa::Result<T>,
    {
        let id = SelemId::new(&self.name, self.index);
        match self.mixer.find_selem(&id) {
            Some(selem) => f(&selem).map_err(Into::into),
            None => Err(Error::ElementGone(self.name.clone())),
        }
    }

    fn query<F: FnOnce(&Selem) -> bool>(&self, f: F) -> bool {
        let id = SelemId::new(&self.name, self.index);
        self.mixer.find_selem(&id).map_or(false, |selem| f(&selem))
    }
}

/// Move a dB write that ALSA rounded down up one step when that is closer
fn round_up_if_closer(
    s: &Selem,
    dir: Direction,
    ch: SelemChannelId,
    target: MilliBel,
) -> alsa::Result<()> {
    let (raw, (_, max)) = match dir {
        Direction::Playback => (s.get_playback_volume(ch)?, s.get_playback_volume_range()),
        Direction::Capture => (s.get_capture_volume(ch)?, s.get_capture_volume_range()),
    };
    if raw >= max {
        return Ok(());
    }

    let step_db = |raw| match dir {
        Direction::Playback => s.ask_playback_vol_db(raw),
        Direction::Capture => s.ask_capture_vol_db(raw),
    };
    let below = (raw, step_db(raw)?.0);
    let above = (raw + 1, step_db(raw + 1)?.0);

    if nearest_step(target, below, above) == raw {
        return Ok(());
    }
    match dir {
        Direction::Playback => s.set_playback_volume(ch, raw + 1),
        Direction::Capture => s.set_capture_volume(ch, raw + 1),
    }
}

impl Element for AlsaElement {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enumerated(&self) -> bool {
        self.query(|s| s.is_enumerated())
    }

    fn is_mono(&self) -> bool {
        match self.volume_direction() {
            Ok(Direction::Capture) => {
                self.query(|s| !s.has_capture_channel(SelemChannelId::FrontRight))
            }
            _ => self.query(|s| s.is_playback_mono()),
        }
    }

    fn has_volume(&self, dir: Direction) -> bool {
        match dir {
            Direction::Playback => self.query(|s| s.has_playback_volume()),
            Direction::Capture => self.query(|s| s.has_capture_volume()),
        }
    }

    fn has_switch(&self, dir: Direction) -> bool {
        match dir {
            Direction::Playback => self.query(|s| s.has_playback_switch()),
            Direction::Capture => self.query(|s| s.has_capture_switch()),
        }
    }

    fn volume_range(&self, dir: Direction) -> (Volume, Volume) {
        self.with_selem(|s| {
            Ok(match dir {
                Direction::Playback => s.get_playback_volume_range(),
                Direction::Capture => s.get_capture_volume_range(),
            })
        })
        .unwrap_or((0, 0))
    }

    fn db_range(&self, dir: Direction) -> Option<(MilliBel, MilliBel)> {
        let (min, max) = self
            .with_selem(|s| {
                Ok(match dir {
                    Direction::Playback => s.get_playback_db_range(),
                    Direction::Capture => s.get_capture_db_range(),
                })
            })
            .ok()?;

        if min.0 < max.0 {
            Some((min.0, max.0))
        } else {
            None
        }
    }

    fn raw_volume(&self, dir: Direction, ch: Channel) -> Result<Volume, Error> {
        self.with_selem(|s| match dir {
            Direction::Playback => s.get_playback_volume(ch.selem_id()),
            Direction::Capture => s.get_capture_volume(ch.selem_id()),
        })
    }

    fn set_raw_volume(&self, dir: Direction, ch: Channel, value: Volume) -> Result<(), Error> {
        let (min, max) = self.volume_range(dir);
        let value = value.max(min).min(max);
        self.with_selem(|s| match dir {
            Direction::Playback => s.set_playback_volume(ch.selem_id(), value),
            Direction::Capture => s.set_capture_volume(ch.selem_id(), value),
        })
    }

    fn db_volume(&self, dir: Direction, ch: Channel) -> Result<MilliBel, Error> {
        self.with_selem(|s| match dir {
            Direction::Playback => s.get_playback_vol_db(ch.selem_id()),
            Direction::Capture => s.get_capture_vol_db(ch.selem_id()),
        })
        .map(|db| db.0)
    }

    fn set_db_volume(
        &self,
        dir: Direction,
        ch: Channel,
        value: MilliBel,
        rounding: Rounding,
    ) -> Result<(), Error> {
        self.with_selem(|s| {
            let id = ch.selem_id();
            match dir {
                Direction::Playback => s.set_playback_db(id, AlsaMilliBel(value), rounding.alsa())?,
                Direction::Capture => s.set_capture_db(id, AlsaMilliBel(value), rounding.alsa())?,
            }
            if rounding == Rounding::Nearest {
                round_up_if_closer(s, dir, id, value)?;
            }
            Ok(())
        })
    }

    fn switch(&self, dir: Direction, ch: Channel) -> Result<bool, Error> {
        self.with_selem(|s| match dir {
            Direction::Playback => s.get_playback_switch(ch.selem_id()),
            Direction::Capture => s.get_capture_switch(ch.selem_id()),
        })
        .map(|value| value != 0)
    }

    fn set_switch_all(&self, dir: Direction, on: bool) -> Result<(), Error> {
        let value = if on { 1 } else { 0 };
        self.with_selem(|s| match dir {
            Direction::Playback => s.set_playback_switch_all(value),
            Direction::Capture => s.set_capture_switch_all(value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_step_picks_the_closer_db_value() {
        // -20.00 dB lies between steps at -20.50 and -19.75
        assert_eq!(nearest_step(-2000, (10, -2050), (11, -1975)), 11);
        assert_eq!(nearest_step(-2040, (10, -2050), (11, -1975)), 10);
        assert_eq!(nearest_step(-2050, (10, -2050), (11, -1975)), 10);
    }

    #[test]
    fn nearest_step_ties_go_down() {
        assert_eq!(nearest_step(-1000, (4, -1100), (5, -900)), 4);
    }
}
