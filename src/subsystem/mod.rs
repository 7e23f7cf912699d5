// SPDX-FileCopyrightText: The midiout authors
// SPDX-License-Identifier: MPL-2.0

use std::{
    borrow::Cow,
    ops::{Deref, DerefMut},
};

use thiserror::Error;

use crate::DeviceIndex;

#[cfg(feature = "midir")]
pub(crate) mod midir;

#[cfg(test)]
pub(crate) mod testing;

#[derive(Debug, Error)]
pub enum SubsystemError {
    #[error("{field} {value} out of range (max: {max})")]
    ValueOutOfRange {
        field: &'static str,
        value: u8,
        max: u8,
    },

    #[error("no output device at index {index}")]
    DeviceNotFound { index: DeviceIndex },

    #[error("Init: {msg}")]
    Init { msg: Cow<'static, str> },

    #[error("Connect: {msg}")]
    Connect { msg: Cow<'static, str> },

    #[error("Send: {msg}")]
    Send { msg: Cow<'static, str> },
}

pub type SubsystemResult<T> = std::result::Result<T, SubsystemError>;

/// Access to MIDI output devices
///
/// The subsystem owns the actual device list. Device indexes refer
/// to the order returned by the most recent invocation of
/// [`MidiOutputSubsystem::list_output_devices()`].
///
/// Implementations are responsible for validating channel, note and
/// velocity values and for reporting any hardware or driver failures.
pub trait MidiOutputSubsystem {
    /// Enumerate the currently available output devices.
    ///
    /// The result might be empty.
    fn list_output_devices(&mut self) -> SubsystemResult<Vec<String>>;

    /// Send a note on message.
    fn send_note(
        &mut self,
        device_index: DeviceIndex,
        channel: u8,
        note: u8,
        velocity: u8,
    ) -> SubsystemResult<()>;

    /// Silence a single channel and reset its controllers.
    fn reset_channel(&mut self, device_index: DeviceIndex, channel: u8) -> SubsystemResult<()>;

    /// Reset the whole device.
    ///
    /// Might take some time to complete.
    fn reset_device(&mut self, device_index: DeviceIndex) -> SubsystemResult<()>;
}

impl<D> MidiOutputSubsystem for D
where
    D: DerefMut,
    <D as Deref>::Target: MidiOutputSubsystem,
{
    fn list_output_devices(&mut self) -> SubsystemResult<Vec<String>> {
        self.deref_mut().list_output_devices()
    }

    fn send_note(
        &mut self,
        device_index: DeviceIndex,
        channel: u8,
        note: u8,
        velocity: u8,
    ) -> SubsystemResult<()> {
        self.deref_mut().send_note(device_index, channel, note, velocity)
    }

    fn reset_channel(&mut self, device_index: DeviceIndex, channel: u8) -> SubsystemResult<()> {
        self.deref_mut().reset_channel(device_index, channel)
    }

    fn reset_device(&mut self, device_index: DeviceIndex) -> SubsystemResult<()> {
        self.deref_mut().reset_device(device_index)
    }
}
