// SPDX-FileCopyrightText: The midiout authors
// SPDX-License-Identifier: MPL-2.0

use super::{MidiOutputSubsystem, SubsystemError, SubsystemResult};
use crate::DeviceIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Call {
    ListOutputDevices,
    SendNote {
        device_index: DeviceIndex,
        channel: u8,
        note: u8,
        velocity: u8,
    },
    ResetChannel {
        device_index: DeviceIndex,
        channel: u8,
    },
    ResetDevice {
        device_index: DeviceIndex,
    },
}

/// Records all invocations without any hardware.
#[derive(Debug, Default)]
pub(crate) struct RecordingSubsystem {
    pub(crate) devices: Vec<String>,
    pub(crate) calls: Vec<Call>,
    /// Fail all invocations as if the device has been disconnected.
    pub(crate) disconnected: bool,
}

impl RecordingSubsystem {
    pub(crate) fn with_devices(devices: &[&str]) -> Self {
        Self {
            devices: devices.iter().copied().map(ToOwned::to_owned).collect(),
            ..Default::default()
        }
    }

    /// Invocations except for device enumeration.
    pub(crate) fn commands(&self) -> Vec<Call> {
        self.calls
            .iter()
            .copied()
            .filter(|call| *call != Call::ListOutputDevices)
            .collect()
    }

    fn record(&mut self, call: Call) -> SubsystemResult<()> {
        self.calls.push(call);
        if self.disconnected {
            return Err(SubsystemError::Send {
                msg: "disconnected".into(),
            });
        }
        Ok(())
    }
}

impl MidiOutputSubsystem for RecordingSubsystem {
    fn list_output_devices(&mut self) -> SubsystemResult<Vec<String>> {
        self.record(Call::ListOutputDevices)?;
        Ok(self.devices.clone())
    }

    fn send_note(
        &mut self,
        device_index: DeviceIndex,
        channel: u8,
        note: u8,
        velocity: u8,
    ) -> SubsystemResult<()> {
        self.record(Call::SendNote {
            device_index,
            channel,
            note,
            velocity,
        })
    }

    fn reset_channel(&mut self, device_index: DeviceIndex, channel: u8) -> SubsystemResult<()> {
        self.record(Call::ResetChannel {
            device_index,
            channel,
        })
    }

    fn reset_device(&mut self, device_index: DeviceIndex) -> SubsystemResult<()> {
        self.record(Call::ResetDevice { device_index })
    }
}
