//! Mapping between device volume and a `[0, 1]` slider position.
//!
//! Elements with dB information are mapped the way alsamixer does it:
//! spans of up to 24 dB are linear in dB, wider spans use an exponential
//! curve so the slider follows perceived loudness. Elements without dB
//! information fall back to their raw range.

use super::{Channel, Direction, Element, MilliBel, Rounding, Volume};
use crate::error::Error;

/// `SND_CTL_TLV_DB_GAIN_MUTE`, the lower bound of a range that ends in silence
pub const DB_GAIN_MUTE: MilliBel = -9_999_999;

/// Widest dB span (in dB) still mapped linearly
const MAX_LINEAR_DB_SCALE: MilliBel = 24;

/// Slack for float noise before rounding up or down
const TOLERANCE: f64 = 1e-6;

fn use_linear_db_scale(min: MilliBel, max: MilliBel) -> bool {
    max - min <= MAX_LINEAR_DB_SCALE * 100
}

pub(crate) fn round_dir(x: f64, rounding: Rounding) -> i64 {
    match rounding {
        Rounding::Nearest => x.round() as i64,
        Rounding::Floor => (x + TOLERANCE).floor() as i64,
        Rounding::Ceil => (x - TOLERANCE).ceil() as i64,
    }
}

fn exp10(x: f64) -> f64 {
    10f64.powf(x)
}

/// Normalized position of the lowest point of a dB range
fn min_norm(min: MilliBel, max: MilliBel) -> f64 {
    exp10((min - max) as f64 / 6000.0)
}

pub(crate) fn raw_to_normalized(value: Volume, (min, max): (Volume, Volume)) -> f64 {
    if min >= max {
        return 0.0;
    }
    (value - min) as f64 / (max - min) as f64
}

pub(crate) fn normalized_to_raw(
    volume: f64,
    (min, max): (Volume, Volume),
    rounding: Rounding,
) -> Volume {
    let value = round_dir(volume * (max - min) as f64, rounding) + min;
    value.max(min).min(max)
}

pub(crate) fn db_to_normalized(value: MilliBel, (min, max): (MilliBel, MilliBel)) -> f64 {
    if use_linear_db_scale(min, max) {
        return (value - min) as f64 / (max - min) as f64;
    }

    let normalized = exp10((value - max) as f64 / 6000.0);
    if min != DB_GAIN_MUTE {
        let min_norm = min_norm(min, max);
        (normalized - min_norm) / (1.0 - min_norm)
    } else {
        normalized
    }
}

pub(crate) fn normalized_to_db(
    volume: f64,
    (min, max): (MilliBel, MilliBel),
    rounding: Rounding,
) -> MilliBel {
    if use_linear_db_scale(min, max) {
        return round_dir(volume * (max - min) as f64, rounding) + min;
    }

    let volume = if min != DB_GAIN_MUTE {
        let min_norm = min_norm(min, max);
        volume * (1.0 - min_norm) + min_norm
    } else {
        volume
    };

    if volume <= 0.0 {
        return min;
    }
    (round_dir(6000.0 * volume.log10(), rounding) + max).max(min)
}

pub fn get_normalized<E: Element + ?Sized>(
    element: &E,
    dir: Direction,
    ch: Channel,
) -> Result<f64, Error> {
    let normalized = match element.db_range(dir) {
        Some(range) => db_to_normalized(element.db_volume(dir, ch)?, range),
        None => raw_to_normalized(element.raw_volume(dir, ch)?, element.volume_range(dir)),
    };
    Ok(normalized.max(0.0).min(1.0))
}

pub fn set_normalized<E: Element + ?Sized>(
    element: &E,
    dir: Direction,
    ch: Channel,
    volume: f64,
    rounding: Rounding,
) -> Result<(), Error> {
    let volume = volume.max(0.0).min(1.0);
    match element.db_range(dir) {
        Some(range) => {
            let value = normalized_to_db(volume, range, rounding);
            element.set_db_volume(dir, ch, value, rounding)
        }
        None => {
            let value = normalized_to_raw(volume, element.volume_range(dir), rounding);
            element.set_raw_volume(dir, ch, value)
        }
    }
}
