// SPDX-FileCopyrightText: The midiout authors
// SPDX-License-Identifier: MPL-2.0

use thiserror::Error;

use crate::{Command, DeviceIndex, DeviceList, MidiOutputSubsystem, NoteCommand, SubsystemError};

mod shared;
pub use self::shared::SharedDispatcher;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no output devices available")]
    NoDevicesAvailable,

    #[error("invalid device selection {index} (number of devices: {len})")]
    InvalidSelection { index: DeviceIndex, len: usize },

    #[error("busy")]
    Busy,

    #[error(transparent)]
    Subsystem(#[from] SubsystemError),
}

pub type DispatchResult<T> = std::result::Result<T, DispatchError>;

/// Forwards commands to a MIDI output subsystem.
///
/// The device index of each command is validated against the device
/// list that has been fetched most recently. Rejected commands never
/// reach the subsystem. Failures of the subsystem are passed through
/// unchanged without retrying.
#[derive(Debug)]
pub struct Dispatcher<S> {
    subsystem: S,
    devices: DeviceList,
}

impl<S> Dispatcher<S>
where
    S: MidiOutputSubsystem,
{
    /// Create a new dispatcher.
    ///
    /// The device list is initially empty. Commands are rejected
    /// until [`Self::refresh_devices()`] has found some devices.
    #[must_use]
    pub fn new(subsystem: S) -> Self {
        Self {
            subsystem,
            devices: DeviceList::default(),
        }
    }

    #[must_use]
    pub const fn devices(&self) -> &DeviceList {
        &self.devices
    }

    #[must_use]
    pub fn device_name(&self, device_index: DeviceIndex) -> Option<&str> {
        self.devices.name(device_index)
    }

    #[must_use]
    pub const fn subsystem(&self) -> &S {
        &self.subsystem
    }

    pub fn subsystem_mut(&mut self) -> &mut S {
        &mut self.subsystem
    }

    #[must_use]
    pub fn into_subsystem(self) -> S {
        self.subsystem
    }

    /// Query the available output devices.
    ///
    /// Replaces the current device list. Any device index that has been
    /// obtained before might refer to a different or no device afterwards.
    /// The current list is kept if the query fails.
    pub fn refresh_devices(&mut self) -> DispatchResult<&DeviceList> {
        let names = self.subsystem.list_output_devices()?;
        let devices = DeviceList::new(names);
        if devices != self.devices {
            log::debug!(
                "Output devices changed: {old:?} -> {new:?}",
                old = self.devices.as_slice(),
                new = devices.as_slice(),
            );
        }
        self.devices = devices;
        if self.devices.is_empty() {
            log::info!("No output devices found");
        }
        Ok(&self.devices)
    }

    fn validate_device_index(&self, device_index: DeviceIndex) -> DispatchResult<()> {
        if self.devices.is_empty() {
            return Err(DispatchError::NoDevicesAvailable);
        }
        if !self.devices.contains_index(device_index) {
            return Err(DispatchError::InvalidSelection {
                index: device_index,
                len: self.devices.len(),
            });
        }
        Ok(())
    }

    /// Validate and forward a command.
    pub fn dispatch(
        &mut self,
        device_index: DeviceIndex,
        command: &Command,
    ) -> DispatchResult<()> {
        if let Err(err) = self.validate_device_index(device_index) {
            log::warn!(
                "Rejecting {kind} for device {device_index}: {err}",
                kind = command.kind()
            );
            return Err(err);
        }
        log::info!(
            "Dispatching {command:?} to device {device_index} \"{device_name}\"",
            device_name = self.devices.name(device_index).unwrap_or_default(),
        );
        match *command {
            Command::SendNote(NoteCommand {
                channel,
                note_number,
                velocity,
            }) => self
                .subsystem
                .send_note(device_index, channel, note_number, velocity)?,
            Command::ResetChannel { channel } => {
                self.subsystem.reset_channel(device_index, channel)?;
            }
            Command::ResetDevice => self.subsystem.reset_device(device_index)?,
        }
        Ok(())
    }

    pub fn send_note(
        &mut self,
        device_index: DeviceIndex,
        channel: u8,
        note_number: u8,
        velocity: u8,
    ) -> DispatchResult<()> {
        let command = Command::SendNote(NoteCommand {
            channel,
            note_number,
            velocity,
        });
        self.dispatch(device_index, &command)
    }

    pub fn reset_channel(&mut self, device_index: DeviceIndex, channel: u8) -> DispatchResult<()> {
        self.dispatch(device_index, &Command::ResetChannel { channel })
    }

    /// Reset the whole device.
    ///
    /// Might block for some seconds and cannot be cancelled. Users should
    /// be warned and asked for confirmation before invoking this.
    pub fn reset_device(&mut self, device_index: DeviceIndex) -> DispatchResult<()> {
        self.dispatch(device_index, &Command::ResetDevice)
    }
}

#[cfg(test)]
mod tests;
