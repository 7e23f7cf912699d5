// SPDX-FileCopyrightText: The midiout authors
// SPDX-License-Identifier: MPL-2.0

//! Interactive session state
//!
//! Everything a front-end needs to remember between user interactions:
//! the selected device and the current note values. The state is created
//! when the session is opened and discarded when it is closed. Nothing
//! is persisted.

use crate::{
    Command, DeviceIndex, DeviceList, DispatchError, DispatchResult, Dispatcher,
    MidiOutputSubsystem, NoteCommand, Revalidation, Selection,
};

/// Advisory message if no output devices are available
pub const NO_DEVICES_ADVISORY: &str = "No MIDI out devices found!";

pub const RESET_DEVICE_TITLE: &str = "Warning!";

pub const RESET_DEVICE_WARNING: &str =
    "You're about to reset this device. Are you sure you want to? This process may take some time.";

/// Ask the user for confirmation
pub trait Confirm {
    #[must_use]
    fn confirm(&mut self, title: &str, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str, &str) -> bool,
{
    fn confirm(&mut self, title: &str, message: &str) -> bool {
        self(title, message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus<'a> {
    /// Advisory state, see [`NO_DEVICES_ADVISORY`]
    NoDevices,
    Ready {
        device_index: DeviceIndex,
        device_name: &'a str,
    },
}

#[derive(Debug)]
pub struct Session<S> {
    dispatcher: Dispatcher<S>,
    selection: Selection,
    note_command: NoteCommand,
}

impl<S> Session<S>
where
    S: MidiOutputSubsystem,
{
    /// Open a new session and fetch the available devices.
    ///
    /// Failing to enumerate the devices is not fatal. The session
    /// then starts without any devices.
    #[must_use]
    pub fn open(subsystem: S) -> Self {
        let mut session = Self {
            dispatcher: Dispatcher::new(subsystem),
            selection: Selection::default(),
            note_command: NoteCommand::default(),
        };
        if let Err(err) = session.refresh() {
            log::warn!("Failed to enumerate output devices: {err}");
        }
        session
    }

    /// Close the session and discard all state.
    #[must_use]
    pub fn close(self) -> S {
        self.dispatcher.into_subsystem()
    }

    #[must_use]
    pub const fn devices(&self) -> &DeviceList {
        self.dispatcher.devices()
    }

    #[must_use]
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    #[must_use]
    pub const fn note_command(&self) -> &NoteCommand {
        &self.note_command
    }

    pub fn note_command_mut(&mut self) -> &mut NoteCommand {
        &mut self.note_command
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus<'_> {
        let device_index = self.selection.index();
        match self.dispatcher.device_name(device_index) {
            Some(device_name) => SessionStatus::Ready {
                device_index,
                device_name,
            },
            None => SessionStatus::NoDevices,
        }
    }

    /// Refresh the device list and revalidate the selection.
    pub fn refresh(&mut self) -> DispatchResult<Revalidation> {
        let devices = self.dispatcher.refresh_devices()?;
        let revalidation = self.selection.revalidate(devices);
        match revalidation {
            Revalidation::Unchanged => (),
            Revalidation::Clamped { from } => {
                log::warn!(
                    "Selected device {from} is no longer available, selecting device {to} instead",
                    to = self.selection.index(),
                );
            }
            Revalidation::Empty => {
                log::warn!("{NO_DEVICES_ADVISORY}");
            }
        }
        Ok(revalidation)
    }

    pub fn select(&mut self, device_index: DeviceIndex) -> DispatchResult<()> {
        let devices = self.dispatcher.devices();
        if devices.is_empty() {
            return Err(DispatchError::NoDevicesAvailable);
        }
        if !devices.contains_index(device_index) {
            return Err(DispatchError::InvalidSelection {
                index: device_index,
                len: devices.len(),
            });
        }
        log::debug!(
            "Selected device {device_index} \"{device_name}\"",
            device_name = devices.name(device_index).unwrap_or_default()
        );
        self.selection = Selection::new(device_index);
        Ok(())
    }

    pub fn send_note(&mut self) -> DispatchResult<()> {
        log::info!("Sending test note");
        let command = Command::SendNote(self.note_command);
        self.dispatcher.dispatch(self.selection.index(), &command)
    }

    pub fn reset_channel(&mut self) -> DispatchResult<()> {
        let device_index = self.selection.index();
        let channel = self.note_command.channel;
        if let Some(device_name) = self.dispatcher.device_name(device_index) {
            log::info!("Resetting channel {channel} on {device_name}");
        }
        self.dispatcher
            .dispatch(device_index, &Command::ResetChannel { channel })
    }

    /// Reset the selected device after confirmation.
    ///
    /// Returns `Ok(false)` if the user declined.
    pub fn reset_device(&mut self, confirm: &mut impl Confirm) -> DispatchResult<bool> {
        let device_index = self.selection.index();
        // Don't bother the user with a command that will be rejected anyway.
        // Dispatching it only returns the error without touching the device.
        if !self.dispatcher.devices().contains_index(device_index) {
            return self.dispatcher.reset_device(device_index).map(|()| false);
        }
        if !confirm.confirm(RESET_DEVICE_TITLE, RESET_DEVICE_WARNING) {
            log::info!("Device reset cancelled");
            return Ok(false);
        }
        self.dispatcher.reset_device(device_index)?;
        Ok(true)
    }
}
