// SPDX-FileCopyrightText: The midiout authors
// SPDX-License-Identifier: MPL-2.0

use derive_more::{Deref, Display, From};

/// Position of an output device
///
/// 0-based index into the most recently enumerated [`DeviceList`].
/// Only meaningful in conjunction with this list and must neither
/// be hard-coded nor stored persistently.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From,
)]
#[repr(transparent)]
pub struct DeviceIndex(usize);

impl DeviceIndex {
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> usize {
        self.0
    }
}

/// Display names of the available output devices
///
/// The order matches the enumeration order of the MIDI output
/// subsystem. A snapshot that is replaced on each refresh.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deref)]
pub struct DeviceList(Vec<String>);

impl DeviceList {
    #[must_use]
    pub const fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    #[must_use]
    pub fn contains_index(&self, index: DeviceIndex) -> bool {
        index.value() < self.0.len()
    }

    #[must_use]
    pub fn name(&self, index: DeviceIndex) -> Option<&str> {
        self.0.get(index.value()).map(String::as_str)
    }

    pub fn iter_indexed(&self) -> impl Iterator<Item = (DeviceIndex, &str)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(index, name)| (DeviceIndex::new(index), name.as_str()))
    }
}

impl From<Vec<String>> for DeviceList {
    fn from(from: Vec<String>) -> Self {
        Self::new(from)
    }
}

/// The currently selected device
///
/// Becomes stale whenever the [`DeviceList`] is refreshed and
/// must then be revalidated before issuing any commands.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    index: DeviceIndex,
}

/// Outcome of [`Selection::revalidate()`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revalidation {
    /// The selected index is still within bounds.
    ///
    /// It might nevertheless refer to a different device now.
    Unchanged,
    /// The selected index was out of bounds and has been clamped.
    Clamped { from: DeviceIndex },
    /// Nothing can be selected from an empty list.
    Empty,
}

impl Selection {
    #[must_use]
    pub const fn new(index: DeviceIndex) -> Self {
        Self { index }
    }

    #[must_use]
    pub const fn index(self) -> DeviceIndex {
        self.index
    }

    #[must_use]
    pub fn is_valid(self, devices: &DeviceList) -> bool {
        devices.contains_index(self.index)
    }

    /// Clamp the selection into the bounds of a refreshed list.
    pub fn revalidate(&mut self, devices: &DeviceList) -> Revalidation {
        if devices.is_empty() {
            self.index = DeviceIndex::default();
            return Revalidation::Empty;
        }
        if self.is_valid(devices) {
            return Revalidation::Unchanged;
        }
        let from = self.index;
        self.index = DeviceIndex::new(devices.len() - 1);
        Revalidation::Clamped { from }
    }
}
