// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Thread-shareable session handle.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::{AdsError, Result};
use crate::encoding::AdsScalar;
use crate::transport::AdsTransport;

use super::{AdsSession, SessionState};

/// A session behind a mutex.
///
/// Every call locks the session for its whole duration, so requests from
/// different threads are serialized and the handle cache is never touched
/// concurrently. Clones share the same session.
#[derive(Debug)]
pub struct SharedSession<T: AdsTransport> {
    inner: Arc<Mutex<AdsSession<T>>>,
}

impl<T: AdsTransport> Clone for SharedSession<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: AdsTransport> SharedSession<T> {
    /// Share `session`.
    pub fn new(session: AdsSession<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, AdsSession<T>>> {
        self.inner
            .lock()
            .map_err(|_| AdsError::Other("session lock poisoned".to_string()))
    }

    /// Run `f` with exclusive access to the session.
    pub fn with<R>(&self, f: impl FnOnce(&mut AdsSession<T>) -> Result<R>) -> Result<R> {
        let mut session = self.lock()?;
        f(&mut session)
    }

    /// Current state.
    pub fn state(&self) -> Result<SessionState> {
        Ok(self.lock()?.state())
    }

    /// Open the session.
    pub fn open(&self) -> Result<()> {
        self.with(|s| s.open())
    }

    /// Close the session.
    pub fn close(&self) -> Result<()> {
        self.with(|s| s.close())
    }

    /// Read a fixed-width scalar by name.
    pub fn read<E: AdsScalar>(&self, name: &str) -> Result<E> {
        self.with(|s| s.read::<E>(name))
    }

    /// Write a fixed-width scalar by name.
    pub fn write<E: AdsScalar>(&self, name: &str, value: E) -> Result<()> {
        self.with(|s| s.write(name, value))
    }

    /// Read a `STRING` variable by name.
    pub fn read_string(&self, name: &str) -> Result<String> {
        self.with(|s| s.read_string(name))
    }

    /// Write a `STRING` variable by name.
    pub fn write_string(&self, name: &str, value: &str) -> Result<()> {
        self.with(|s| s.write_string(name, value))
    }

    /// Recover the session if this is the last handle to it.
    pub fn try_unwrap(self) -> std::result::Result<AdsSession<T>, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => match mutex.into_inner() {
                Ok(session) => Ok(session),
                Err(poisoned) => Ok(poisoned.into_inner()),
            },
            Err(inner) => Err(Self { inner }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;

    #[test]
    fn test_threads_share_cache() {
        let device = MemoryTransport::new()
            .with_symbol("GVL.a", 4)
            .with_symbol("GVL.b", 4);
        let shared = SharedSession::new(AdsSession::with_address(device, "1.1.1.1.1.1", 851));
        shared.open().unwrap();

        std::thread::scope(|scope| {
            for (name, value) in [("GVL.a", 1i32), ("GVL.b", 2i32)] {
                let shared = shared.clone();
                scope.spawn(move || {
                    for _ in 0..10 {
                        shared.write(name, value).unwrap();
                        assert_eq!(shared.read::<i32>(name).unwrap(), value);
                    }
                });
            }
        });

        shared.close().unwrap();
        let session = shared.try_unwrap().unwrap();
        let device = session.into_transport();
        assert_eq!(device.resolve_count(), 2);
        assert_eq!(device.symbol_bytes("GVL.b"), Some(&2i32.to_le_bytes()[..]));
    }
}
