//! Measurement categories
//!
//! A category is a closed class of mutually compatible measurement kinds.
//! Each one is a zero-sized marker type, so `Measurement<Mass>` and
//! `Measurement<Length>` are distinct types and mixing them is rejected by
//! the compiler. `NAME` is the runtime tag stored on every `Unit`, checked
//! wherever a unit enters a typed measurement.

use std::fmt;
use std::hash::Hash;

/// A measurement category tag
pub trait Category: fmt::Debug + Copy + Eq + Hash + Send + Sync + 'static {
    /// Runtime name, also used as the tag on units
    const NAME: &'static str;
}

/// Mass, measured against the gram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mass;

/// Length, measured against the meter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Length;

/// Volume, measured against the liter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Volume;

impl Category for Mass {
    const NAME: &'static str = "mass";
}

impl Category for Length {
    const NAME: &'static str = "length";
}

impl Category for Volume {
    const NAME: &'static str = "volume";
}

/// Names of the built-in categories, in registration order
pub const CATEGORY_NAMES: [&str; 3] = [Mass::NAME, Length::NAME, Volume::NAME];
