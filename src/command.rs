// SPDX-FileCopyrightText: The midiout authors
// SPDX-License-Identifier: MPL-2.0

use strum::EnumDiscriminants;

/// A single note on event
///
/// The values are forwarded verbatim. Range checking is up to the
/// MIDI output subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteCommand {
    pub channel: u8,
    pub note_number: u8,
    pub velocity: u8,
}

impl NoteCommand {
    /// Middle C
    pub const DEFAULT_NOTE_NUMBER: u8 = 60;

    pub const DEFAULT_VELOCITY: u8 = 100;
}

impl Default for NoteCommand {
    fn default() -> Self {
        Self {
            channel: 0,
            note_number: Self::DEFAULT_NOTE_NUMBER,
            velocity: Self::DEFAULT_VELOCITY,
        }
    }
}

/// Commands that could be issued for an output device
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumDiscriminants)]
#[strum_discriminants(name(CommandKind), derive(strum::Display, strum::IntoStaticStr))]
pub enum Command {
    SendNote(NoteCommand),
    ResetChannel { channel: u8 },
    /// Reset the whole device
    ///
    /// Might take a few seconds to complete.
    ResetDevice,
}

impl Command {
    #[must_use]
    pub fn kind(&self) -> CommandKind {
        self.into()
    }

    /// Destructive and/or slow commands that should be confirmed
    /// by the user before issuing them.
    #[must_use]
    pub const fn requires_confirmation(&self) -> bool {
        matches!(self, Self::ResetDevice)
    }
}

impl From<NoteCommand> for Command {
    fn from(from: NoteCommand) -> Self {
        Self::SendNote(from)
    }
}
