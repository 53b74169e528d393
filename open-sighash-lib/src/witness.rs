//! Mandatory group-input prefix and witness finalization: the two steps
//! that bracket the caller-selected coverage array and turn it into the
//! final signing digest.
use ckb_std::{ckb_constants::Source, ckb_types::packed::WitnessArgsReader, error::SysError};
use molecule::prelude::Reader;

use crate::{
    adapter::{self, WITNESS_BUF},
    coverage,
    error::Error,
    hasher::Hasher,
};

pub const SIGNATURE_LEN: usize = 65;

/// Unconditionally absorbs every input in the current script group,
/// streamed via the hasher, indices `0, 1, 2, …` until `IndexOutOfBound`.
/// This anti-replay prefix precedes any caller-selected coverage and cannot
/// be opted out of by the signer.
pub fn hash_group_inputs(hasher: &mut Hasher) -> Result<(), Error> {
    let mut index = 0usize;
    loop {
        let result = hasher.absorb_object(|buf, off| {
            adapter::load_input(buf, off, index, Source::GroupInput)
        });
        match result {
            Ok(()) => index += 1,
            Err(Error::Sys(SysError::IndexOutOfBound)) => {
                #[cfg(feature = "log")]
                ckb_std::debug!("group-input prefix absorbed: {} input(s)", index);
                return Ok(());
            }
            Err(e) => return Err(e),
        }
    }
}

/// Parses the coverage array out of the group's first witness,
/// drives the interpreter, zeroes the seal before absorbing that witness,
/// then absorbs the remaining group witnesses and the transaction-global
/// orphan tail. Consumes `hasher`, finalizing it exactly once.
///
/// Returns the 32-byte digest and the 65-byte seal that was covered (before
/// zeroing), ready for `verify::recover_pubkey_hash`.
pub fn finalize_message(mut hasher: Hasher) -> Result<([u8; 32], [u8; SIGNATURE_LEN]), Error> {
    let mut wbuf = [0u8; WITNESS_BUF];
    let len0 = adapter::load_witness(&mut wbuf, 0, Source::GroupInput)?;

    let (sig_offset, signature) = {
        let slice = &wbuf[..len0];
        let args = WitnessArgsReader::from_slice(slice)?;
        let lock = args.lock().to_opt().ok_or(Error::Encoding)?;
        let lock_bytes = lock.raw_data();

        let ops_len = coverage::run(lock_bytes, &mut hasher)?;
        if lock_bytes.len() != ops_len + SIGNATURE_LEN {
            return Err(Error::ArgumentsLen);
        }

        let sig_offset = (lock_bytes.as_ptr() as usize - slice.as_ptr() as usize) + ops_len;
        let mut signature = [0u8; SIGNATURE_LEN];
        signature.copy_from_slice(&slice[sig_offset..sig_offset + SIGNATURE_LEN]);
        (sig_offset, signature)
    };

    wbuf[sig_offset..sig_offset + SIGNATURE_LEN].fill(0);
    hasher.absorb(&(len0 as u64).to_le_bytes());
    hasher.absorb(&wbuf[..len0]);

    let mut index = 1usize;
    loop {
        match adapter::load_witness(&mut wbuf, index, Source::GroupInput) {
            Ok(len) => {
                hasher.absorb(&(len as u64).to_le_bytes());
                hasher.absorb(&wbuf[..len]);
                index += 1;
            }
            Err(Error::Sys(SysError::IndexOutOfBound)) => break,
            Err(e) => return Err(e),
        }
    }

    let total_inputs = adapter::count_inputs()?;
    let mut index = total_inputs;
    loop {
        match adapter::load_witness(&mut wbuf, index, Source::Input) {
            Ok(len) => {
                hasher.absorb(&(len as u64).to_le_bytes());
                hasher.absorb(&wbuf[..len]);
                index += 1;
            }
            Err(Error::Sys(SysError::IndexOutOfBound)) => break,
            Err(e) => return Err(e),
        }
    }

    let digest = hasher.finalize();
    #[cfg(feature = "log")]
    ckb_std::debug!("witness finalized, digest = {:02x?}", digest);
    Ok((digest, signature))
}
