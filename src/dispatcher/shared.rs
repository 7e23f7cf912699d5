// SPDX-FileCopyrightText: The midiout authors
// SPDX-License-Identifier: MPL-2.0

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use super::{DispatchError, DispatchResult, Dispatcher};
use crate::{Command, DeviceIndex, DeviceList, MidiOutputSubsystem};

/// A [`Dispatcher`] that could be shared between threads.
///
/// Overlapping invocations are rejected with [`DispatchError::Busy`]
/// instead of being queued, e.g. when a front-end triggers a second
/// device reset while the first one is still in progress.
#[derive(Debug)]
pub struct SharedDispatcher<S> {
    inner: Arc<Mutex<Dispatcher<S>>>,
}

impl<S> Clone for SharedDispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> SharedDispatcher<S>
where
    S: MidiOutputSubsystem,
{
    #[must_use]
    pub fn new(dispatcher: Dispatcher<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(dispatcher)),
        }
    }

    fn try_lock(&self) -> DispatchResult<MutexGuard<'_, Dispatcher<S>>> {
        self.inner.try_lock().ok_or_else(|| {
            log::warn!("Rejecting overlapping invocation");
            DispatchError::Busy
        })
    }

    /// Snapshot of the current device list.
    pub fn devices(&self) -> DispatchResult<DeviceList> {
        Ok(self.try_lock()?.devices().clone())
    }

    pub fn refresh_devices(&self) -> DispatchResult<DeviceList> {
        self.try_lock()?.refresh_devices().cloned()
    }

    pub fn dispatch(&self, device_index: DeviceIndex, command: &Command) -> DispatchResult<()> {
        self.try_lock()?.dispatch(device_index, command)
    }

    pub fn send_note(
        &self,
        device_index: DeviceIndex,
        channel: u8,
        note_number: u8,
        velocity: u8,
    ) -> DispatchResult<()> {
        self.try_lock()?.send_note(device_index, channel, note_number, velocity)
    }

    pub fn reset_channel(&self, device_index: DeviceIndex, channel: u8) -> DispatchResult<()> {
        self.try_lock()?.reset_channel(device_index, channel)
    }

    pub fn reset_device(&self, device_index: DeviceIndex) -> DispatchResult<()> {
        self.try_lock()?.reset_device(device_index)
    }
}
