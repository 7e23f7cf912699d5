// SPDX-FileCopyrightText: The midiout authors
// SPDX-License-Identifier: MPL-2.0

//! MIDI channel voice messages
//!
//! Only the few messages needed for sending notes and resetting
//! channels or devices are supported.

use crate::SubsystemError;

/// Number of MIDI channels per device
pub const NUM_CHANNELS: u8 = 16;

/// Largest 7-bit data byte value
pub const MAX_U7: u8 = 0x7f;

const STATUS_NOTE_OFF: u8 = 0x80;
const STATUS_NOTE_ON: u8 = 0x90;
const STATUS_CONTROL_CHANGE: u8 = 0xb0;

/// Control change: All Sound Off
pub const CC_ALL_SOUND_OFF: u8 = 0x78;

/// Control change: Reset All Controllers
pub const CC_RESET_ALL_CONTROLLERS: u8 = 0x79;

/// Control change: All Notes Off
pub const CC_ALL_NOTES_OFF: u8 = 0x7b;

/// A single 3-byte MIDI message
pub type ShortMessage = [u8; 3];

fn check_channel(channel: u8) -> Result<u8, SubsystemError> {
    if channel < NUM_CHANNELS {
        Ok(channel)
    } else {
        Err(SubsystemError::ValueOutOfRange {
            field: "channel",
            value: channel,
            max: NUM_CHANNELS - 1,
        })
    }
}

fn check_u7(field: &'static str, value: u8) -> Result<u8, SubsystemError> {
    if value <= MAX_U7 {
        Ok(value)
    } else {
        Err(SubsystemError::ValueOutOfRange {
            field,
            value,
            max: MAX_U7,
        })
    }
}

pub fn note_on(channel: u8, note: u8, velocity: u8) -> Result<ShortMessage, SubsystemError> {
    Ok([
        STATUS_NOTE_ON | check_channel(channel)?,
        check_u7("note", note)?,
        check_u7("velocity", velocity)?,
    ])
}

pub fn note_off(channel: u8, note: u8) -> Result<ShortMessage, SubsystemError> {
    Ok([
        STATUS_NOTE_OFF | check_channel(channel)?,
        check_u7("note", note)?,
        0x00,
    ])
}

pub fn control_change(
    channel: u8,
    controller: u8,
    value: u8,
) -> Result<ShortMessage, SubsystemError> {
    Ok([
        STATUS_CONTROL_CHANGE | check_channel(channel)?,
        check_u7("controller", controller)?,
        check_u7("value", value)?,
    ])
}

/// Messages for silencing a single channel and resetting its controllers.
pub fn reset_channel(channel: u8) -> Result<[ShortMessage; 3], SubsystemError> {
    Ok([
        control_change(channel, CC_ALL_SOUND_OFF, 0)?,
        control_change(channel, CC_RESET_ALL_CONTROLLERS, 0)?,
        control_change(channel, CC_ALL_NOTES_OFF, 0)?,
    ])
}

/// Messages for resetting a whole device.
///
/// Resets all channels and then sends an explicit note off for every
/// note on every channel. Some devices ignore the channel mode messages,
/// so the latter are needed. Sending all of them takes a while.
pub fn reset_device() -> impl Iterator<Item = ShortMessage> {
    let channel_resets = (0..NUM_CHANNELS).flat_map(|channel| {
        [
            CC_ALL_SOUND_OFF,
            CC_RESET_ALL_CONTROLLERS,
            CC_ALL_NOTES_OFF,
        ]
        .map(|controller| [STATUS_CONTROL_CHANGE | channel, controller, 0x00])
    });
    let note_offs = (0..NUM_CHANNELS).flat_map(|channel| {
        (0..=MAX_U7).map(move |note| [STATUS_NOTE_OFF | channel, note, 0x00])
    });
    channel_resets.chain(note_offs)
}
