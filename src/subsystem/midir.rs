// SPDX-FileCopyrightText: The midiout authors
// SPDX-License-Identifier: MPL-2.0

use std::borrow::Cow;

use midir::{
    ConnectError, InitError, MidiOutput, MidiOutputConnection, MidiOutputPort, SendError,
};

use super::{MidiOutputSubsystem, SubsystemError, SubsystemResult};
use crate::{
    message::{self, ShortMessage},
    DeviceIndex,
};

const UNKNOWN_PORT_NAME: &str = "unknown";

impl From<InitError> for SubsystemError {
    fn from(err: InitError) -> Self {
        SubsystemError::Init {
            msg: err.to_string().into(),
        }
    }
}

impl From<ConnectError<MidiOutput>> for SubsystemError {
    fn from(err: ConnectError<MidiOutput>) -> Self {
        SubsystemError::Connect {
            msg: err.to_string().into(),
        }
    }
}

impl From<SendError> for SubsystemError {
    fn from(err: SendError) -> Self {
        SubsystemError::Send {
            msg: err.to_string().into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidirConfig {
    /// Client name that is announced to the MIDI backend.
    pub client_name: Cow<'static, str>,
}

impl MidirConfig {
    pub const DEFAULT_CLIENT_NAME: &'static str = "midiout";
}

impl Default for MidirConfig {
    fn default() -> Self {
        Self {
            client_name: Self::DEFAULT_CLIENT_NAME.into(),
        }
    }
}

struct MidirOutputPort {
    name: String,
    port: MidiOutputPort,
    connection: Option<MidiOutputConnection>,
}

impl MidirOutputPort {
    fn connect(&mut self, client_name: &str) -> SubsystemResult<&mut MidiOutputConnection> {
        let connection = if let Some(connection) = self.connection.take() {
            connection
        } else {
            log::debug!("Connecting output port \"{name}\"", name = self.name);
            MidiOutput::new(client_name)?.connect(&self.port, &self.name)?
        };
        Ok(self.connection.insert(connection))
    }

    fn disconnect(&mut self) {
        let Some(connection) = self.connection.take() else {
            return;
        };
        log::debug!("Disconnecting output port \"{name}\"", name = self.name);
        connection.close();
    }

    fn send_all(
        &mut self,
        client_name: &str,
        messages: impl IntoIterator<Item = ShortMessage>,
    ) -> SubsystemResult<()> {
        let connection = self.connect(client_name)?;
        let mut result = Ok(());
        for message in messages {
            log::trace!("Sending MIDI output: {message:02x?}");
            if let Err(err) = connection.send(&message) {
                result = Err(err.into());
                break;
            }
        }
        if result.is_err() {
            // Reconnect on next use
            self.disconnect();
        }
        result
    }
}

/// MIDI output subsystem driven by [`midir`].
///
/// Connections to output ports are opened on first use and then
/// kept open until the port disappears or a send fails.
#[allow(missing_debug_implementations)]
pub struct MidirOutputSubsystem {
    config: MidirConfig,
    output: MidiOutput,
    ports: Vec<MidirOutputPort>,
}

impl MidirOutputSubsystem {
    pub fn new(config: MidirConfig) -> SubsystemResult<Self> {
        let output = MidiOutput::new(&format!(
            "{client_name} output port watcher",
            client_name = config.client_name
        ))?;
        Ok(Self {
            config,
            output,
            ports: Vec::new(),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &MidirConfig {
        &self.config
    }

    fn port_mut(&mut self, device_index: DeviceIndex) -> SubsystemResult<&mut MidirOutputPort> {
        self.ports
            .get_mut(device_index.value())
            .ok_or(SubsystemError::DeviceNotFound {
                index: device_index,
            })
    }

    fn send_all(
        &mut self,
        device_index: DeviceIndex,
        messages: impl IntoIterator<Item = ShortMessage>,
    ) -> SubsystemResult<()> {
        let client_name = self.config.client_name.clone();
        self.port_mut(device_index)?.send_all(&client_name, messages)
    }
}

impl MidiOutputSubsystem for MidirOutputSubsystem {
    fn list_output_devices(&mut self) -> SubsystemResult<Vec<String>> {
        let mut old_ports = std::mem::take(&mut self.ports);
        for port in self.output.ports() {
            let name = self.output.port_name(&port).unwrap_or_else(|err| {
                log::warn!("Failed to query output port name: {err}");
                UNKNOWN_PORT_NAME.to_owned()
            });
            let index = self.ports.len();
            // Keep the connection if the port has not moved
            let connection = old_ports
                .get_mut(index)
                .filter(|old_port| old_port.name == name)
                .and_then(|old_port| old_port.connection.take());
            log::debug!("Found output port #{index}: \"{name}\"");
            self.ports.push(MidirOutputPort {
                name,
                port,
                connection,
            });
        }
        for mut old_port in old_ports {
            old_port.disconnect();
        }
        Ok(self.ports.iter().map(|port| port.name.clone()).collect())
    }

    fn send_note(
        &mut self,
        device_index: DeviceIndex,
        channel: u8,
        note: u8,
        velocity: u8,
    ) -> SubsystemResult<()> {
        let message = message::note_on(channel, note, velocity)?;
        self.send_all(device_index, [message])
    }

    fn reset_channel(&mut self, device_index: DeviceIndex, channel: u8) -> SubsystemResult<()> {
        let messages = message::reset_channel(channel)?;
        self.send_all(device_index, messages)
    }

    fn reset_device(&mut self, device_index: DeviceIndex) -> SubsystemResult<()> {
        self.send_all(device_index, message::reset_device())
    }
}
