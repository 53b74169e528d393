//! A single BLAKE2b-256 absorbing session.
//!
//! Initialized once by the top-level verifier, fed in strict order by the
//! group-input prefix, the coverage interpreter and the witness finalizer,
//! and finalized exactly once. Uses CKB's standard `"ckb-default-hash"`
//! personalization via `ckb_hash::new_blake2b`.
use ckb_hash::Blake2b;
use ckb_std::error::SysError;

use crate::{adapter::STREAM_WINDOW, error::Error};

pub struct Hasher(Blake2b);

impl Hasher {
    pub fn new() -> Self {
        Hasher(ckb_hash::new_blake2b())
    }

    /// Appends `bytes` to the session with no framing.
    pub fn absorb(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    /// Streams an arbitrarily large host object into the session in
    /// `STREAM_WINDOW`-sized chunks:
    ///
    /// - the first window absorbs `min(reported_length, WINDOW)` bytes and
    ///   establishes `offset`;
    /// - subsequent windows re-issue a positioned read at `offset` until
    ///   `offset == reported_length`.
    ///
    /// `load(buf, offset)` must behave like the raw `adapter` cell/input
    /// readers: fill `buf` starting at `offset` and return `Ok(total_length)`
    /// when the object fit, or `Err(SysError::LengthNotEnough(total_length))`
    /// when it didn't — in which case `buf` still holds the leading
    /// `buf.len()` bytes, per CKB's syscall convention (a truncated read is
    /// not a failed one). Any other `SysError` is fatal.
    pub fn absorb_object<F>(&mut self, mut load: F) -> Result<(), Error>
    where
        F: FnMut(&mut [u8], usize) -> Result<usize, SysError>,
    {
        fn read_len(result: Result<usize, SysError>) -> Result<usize, Error> {
            match result {
                Ok(len) => Ok(len),
                Err(SysError::LengthNotEnough(total)) => Ok(total),
                Err(e) => Err(e.into()),
            }
        }

        let mut window = [0u8; STREAM_WINDOW];
        let reported_length = read_len(load(&mut window, 0))?;
        let mut absorbed = reported_length.min(STREAM_WINDOW);
        self.absorb(&window[..absorbed]);

        while absorbed < reported_length {
            let total = read_len(load(&mut window, absorbed))?;
            debug_assert_eq!(total, reported_length);
            let chunk = (reported_length - absorbed).min(STREAM_WINDOW);
            self.absorb(&window[..chunk]);
            absorbed += chunk;
        }
        Ok(())
    }

    pub fn finalize(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        self.0.finalize(&mut out);
        out
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}
