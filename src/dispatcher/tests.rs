// SPDX-FileCopyrightText: The midiout authors
// SPDX-License-Identifier: MPL-2.0

use super::*;
use crate::subsystem::testing::{Call, RecordingSubsystem};

fn refreshed_dispatcher(devices: &[&str]) -> Dispatcher<RecordingSubsystem> {
    let mut dispatcher = Dispatcher::new(RecordingSubsystem::with_devices(devices));
    dispatcher.refresh_devices().unwrap();
    dispatcher
}

fn all_commands() -> [Command; 3] {
    [
        Command::SendNote(NoteCommand {
            channel: 1,
            note_number: 60,
            velocity: 100,
        }),
        Command::ResetChannel { channel: 1 },
        Command::ResetDevice,
    ]
}

#[test]
fn reject_commands_before_refresh() {
    let mut dispatcher = Dispatcher::new(RecordingSubsystem::with_devices(&["SynthA"]));
    assert!(matches!(
        dispatcher.send_note(DeviceIndex::new(0), 1, 60, 100),
        Err(DispatchError::NoDevicesAvailable)
    ));
    assert!(dispatcher.subsystem().calls.is_empty());
}

#[test]
fn reject_commands_without_devices() {
    let mut dispatcher = refreshed_dispatcher(&[]);
    assert!(dispatcher.devices().is_empty());
    assert!(matches!(
        dispatcher.send_note(DeviceIndex::new(0), 1, 60, 100),
        Err(DispatchError::NoDevicesAvailable)
    ));
    for command in all_commands() {
        assert!(matches!(
            dispatcher.dispatch(DeviceIndex::new(0), &command),
            Err(DispatchError::NoDevicesAvailable)
        ));
    }
    assert!(dispatcher.subsystem().commands().is_empty());
}

#[test]
fn accept_every_index_within_bounds() {
    let devices = ["SynthA", "SynthB", "SynthC"];
    let mut dispatcher = refreshed_dispatcher(&devices);
    for index in 0..devices.len() {
        dispatcher.reset_channel(DeviceIndex::new(index), 0).unwrap();
    }
    assert_eq!(devices.len(), dispatcher.subsystem().commands().len());
}

#[test]
fn reject_every_index_out_of_bounds() {
    let mut dispatcher = refreshed_dispatcher(&["SynthA", "SynthB"]);
    for index in [2, 3, 100, usize::MAX] {
        for command in all_commands() {
            assert!(matches!(
                dispatcher.dispatch(DeviceIndex::new(index), &command),
                Err(DispatchError::InvalidSelection { index: rejected, len: 2 })
                    if rejected == DeviceIndex::new(index)
            ));
        }
    }
    assert!(dispatcher.subsystem().commands().is_empty());
}

#[test]
fn forward_reset_channel_verbatim() {
    let mut dispatcher = refreshed_dispatcher(&["SynthA", "SynthB"]);
    dispatcher.reset_channel(DeviceIndex::new(1), 3).unwrap();
    assert_eq!(
        vec![Call::ResetChannel {
            device_index: DeviceIndex::new(1),
            channel: 3,
        }],
        dispatcher.subsystem().commands()
    );
}

#[test]
fn forward_note_values_without_validation() {
    let mut dispatcher = refreshed_dispatcher(&["SynthA"]);
    // Range checks are up to the subsystem
    dispatcher.send_note(DeviceIndex::new(0), 200, 255, 128).unwrap();
    dispatcher.reset_device(DeviceIndex::new(0)).unwrap();
    assert_eq!(
        vec![
            Call::SendNote {
                device_index: DeviceIndex::new(0),
                channel: 200,
                note: 255,
                velocity: 128,
            },
            Call::ResetDevice {
                device_index: DeviceIndex::new(0),
            },
        ],
        dispatcher.subsystem().commands()
    );
}

#[test]
fn stale_index_after_shrinking_refresh() {
    let mut dispatcher = refreshed_dispatcher(&["SynthA", "SynthB", "SynthC", "SynthD"]);
    let stale_index = DeviceIndex::new(3);
    dispatcher.reset_device(stale_index).unwrap();
    assert_eq!(1, dispatcher.subsystem().commands().len());

    dispatcher.subsystem.devices = vec!["SynthA".to_owned()];
    dispatcher.refresh_devices().unwrap();
    for command in all_commands() {
        assert!(matches!(
            dispatcher.dispatch(stale_index, &command),
            Err(DispatchError::InvalidSelection { len: 1, .. })
        ));
    }
    assert_eq!(1, dispatcher.subsystem().commands().len());
}

#[test]
fn refresh_replaces_device_list() {
    let mut dispatcher = refreshed_dispatcher(&["SynthA", "SynthB"]);
    dispatcher.subsystem.devices = vec!["SynthC".to_owned()];
    let devices = dispatcher.refresh_devices().unwrap();
    assert_eq!(&["SynthC".to_owned()], devices.as_slice());
    assert_eq!(Some("SynthC"), dispatcher.device_name(DeviceIndex::new(0)));
    assert_eq!(None, dispatcher.device_name(DeviceIndex::new(1)));
}

#[test]
fn refresh_is_idempotent() {
    let mut dispatcher = refreshed_dispatcher(&["SynthA", "SynthB"]);
    let first = dispatcher.devices().clone();
    let second = dispatcher.refresh_devices().unwrap().clone();
    assert_eq!(first, second);
}

#[test]
fn keep_device_list_if_refresh_fails() {
    let mut dispatcher = refreshed_dispatcher(&["SynthA"]);
    dispatcher.subsystem.disconnected = true;
    assert!(matches!(
        dispatcher.refresh_devices(),
        Err(DispatchError::Subsystem(SubsystemError::Send { .. }))
    ));
    assert_eq!(Some("SynthA"), dispatcher.device_name(DeviceIndex::new(0)));
}

#[test]
fn propagate_subsystem_failure_without_retry() {
    let mut dispatcher = refreshed_dispatcher(&["SynthA"]);
    dispatcher.subsystem.disconnected = true;
    assert!(matches!(
        dispatcher.reset_device(DeviceIndex::new(0)),
        Err(DispatchError::Subsystem(SubsystemError::Send { .. }))
    ));
    assert_eq!(1, dispatcher.subsystem().commands().len());
}

#[test]
fn only_device_reset_requires_confirmation() {
    let [send_note, reset_channel, reset_device] = all_commands();
    assert!(!send_note.requires_confirmation());
    assert!(!reset_channel.requires_confirmation());
    assert!(reset_device.requires_confirmation());
    assert_eq!("ResetDevice", reset_device.kind().to_string());
}

#[test]
fn dispatch_through_borrowed_subsystem() {
    let mut subsystem = RecordingSubsystem::with_devices(&["SynthA"]);
    let mut dispatcher = Dispatcher::new(&mut subsystem);
    dispatcher.refresh_devices().unwrap();
    dispatcher.reset_channel(DeviceIndex::new(0), 9).unwrap();
    drop(dispatcher);
    assert_eq!(
        vec![Call::ResetChannel {
            device_index: DeviceIndex::new(0),
            channel: 9,
        }],
        subsystem.commands()
    );
}
