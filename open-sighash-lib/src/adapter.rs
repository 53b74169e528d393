//! Bounded reads over the host VM's address space.
//!
//! Every function here is a thin wrapper over a `ckb_std::syscalls` entry
//! point: it fills a caller-provided buffer and returns the syscall's
//! authoritative total length. Buffers are fixed-size arrays on the
//! caller's stack frame, never heap-allocated.
use ckb_std::{
    ckb_constants::{CellField, InputField, Source},
    ckb_types::packed::CellInput,
    error::SysError,
    syscalls,
};
use molecule::NUMBER_SIZE;

use crate::error::Error;

/// Scripts and witnesses are bounded at 32 KiB.
pub const WITNESS_BUF: usize = 32 * 1024;
/// Scripts and witnesses are bounded at 32 KiB.
pub const SCRIPT_BUF: usize = 32 * 1024;
/// Window size for chunked cell/input streaming (`hasher::Hasher::absorb_object`).
pub const STREAM_WINDOW: usize = 16 * 1024;
/// Inputs (44 bytes serialized) are read in one shot through a small buffer.
pub const INPUT_BUF: usize = 4 * 1024;

/// Loads the 32-byte transaction hash. A length other than 32 is a protocol
/// violation (`Error::Syscall`), not a buffer-size issue.
pub fn load_tx_hash() -> Result<[u8; 32], Error> {
    let mut buf = [0u8; 32];
    let len = syscalls::load_tx_hash(&mut buf, 0)?;
    if len != 32 {
        return Err(Error::Syscall);
    }
    Ok(buf)
}

/// Loads the currently executing script into a fixed 32 KiB buffer.
/// Overrunning the buffer is `Error::ScriptTooLong`, not a generic syscall
/// error.
pub fn load_script(buf: &mut [u8; SCRIPT_BUF]) -> Result<usize, Error> {
    match syscalls::load_script(buf, 0) {
        Ok(len) if len <= buf.len() => Ok(len),
        Ok(_) | Err(SysError::LengthNotEnough(_)) => Err(Error::ScriptTooLong),
        Err(e) => Err(e.into()),
    }
}

/// Loads one witness into a fixed 32 KiB buffer. Overrunning the buffer is
/// `Error::WitnessSize`; all other errors, including `IndexOutOfBound`,
/// propagate to the caller for interpretation (loop terminator vs. fatal).
pub fn load_witness(
    buf: &mut [u8; WITNESS_BUF],
    index: usize,
    source: Source,
) -> Result<usize, Error> {
    match syscalls::load_witness(buf, 0, index, source) {
        Ok(len) if len <= buf.len() => Ok(len),
        Ok(_) | Err(SysError::LengthNotEnough(_)) => Err(Error::WitnessSize),
        Err(e) => Err(e.into()),
    }
}

/// Raw, positioned cell read. Errors (including `IndexOutOfBound`) are left
/// to the caller, since cell indices are either explicit coverage-op
/// references (fatal on failure) or group-input loop cursors (terminator on
/// `IndexOutOfBound`).
pub fn load_cell(
    buf: &mut [u8],
    offset: usize,
    index: usize,
    source: Source,
) -> Result<usize, SysError> {
    syscalls::load_cell(buf, offset, index, source)
}

/// Raw, positioned cell-data read.
pub fn load_cell_data(
    buf: &mut [u8],
    offset: usize,
    index: usize,
    source: Source,
) -> Result<usize, SysError> {
    syscalls::load_cell_data(buf, offset, index, source)
}

/// Raw, positioned single-field cell read (capacity / lock / type).
pub fn load_cell_by_field(
    buf: &mut [u8],
    offset: usize,
    index: usize,
    source: Source,
    field: CellField,
) -> Result<usize, SysError> {
    syscalls::load_cell_by_field(buf, offset, index, source, field)
}

/// Raw, positioned input read (44-byte `CellInput`: 8-byte since + 36-byte outpoint).
pub fn load_input(
    buf: &mut [u8],
    offset: usize,
    index: usize,
    source: Source,
) -> Result<usize, SysError> {
    syscalls::load_input(buf, offset, index, source)
}

/// Raw, positioned single-field input read (since / outpoint).
pub fn load_input_by_field(
    buf: &mut [u8],
    offset: usize,
    index: usize,
    source: Source,
    field: InputField,
) -> Result<usize, SysError> {
    syscalls::load_input_by_field(buf, offset, index, source, field)
}

/// Number of inputs in the whole transaction: the index where the
/// transaction-global "orphan" witness tail begins.
///
/// The molecule encoding of `Transaction` is:
/// `full-size|raw-offset|witnesses-offset|raw-full-size|version-offset|cell_deps-offset|header_deps-offset|inputs-offset|outputs-offset|...`
/// with every offset a 4-byte `u32`, so reading the 8 bytes at [28, 36) gives
/// the inputs and outputs offsets directly; their difference (minus the
/// fixvec length prefix) divided by `CellInput::TOTAL_SIZE` is the input
/// count. This avoids a linear `Source::Input` scan purely to find `N`.
pub fn count_inputs() -> Result<usize, Error> {
    let mut offsets = [0u8; 8];
    match syscalls::load_transaction(&mut offsets, 28) {
        Err(SysError::LengthNotEnough(_)) => {}
        Err(e) => return Err(e.into()),
        Ok(_) => unreachable!("8-byte read of a real transaction always underruns"),
    }
    let inputs_offset = u32::from_le_bytes(offsets[0..4].try_into().unwrap());
    let outputs_offset = u32::from_le_bytes(offsets[4..8].try_into().unwrap());
    Ok((outputs_offset as usize - inputs_offset as usize - NUMBER_SIZE) / CellInput::TOTAL_SIZE)
}
