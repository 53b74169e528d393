//! Sighash-coverage language: binary format and interpreter.
use ckb_std::{
    ckb_constants::{CellField, InputField, Source},
    ckb_types::packed::{OutPointReader, ScriptReader},
    error::SysError,
};
use molecule::prelude::Reader;

use crate::{adapter, error::Error, hasher::Hasher};

pub const LABEL_SIGHASH_ALL: u8 = 0x0;
pub const LABEL_OUTPUT: u8 = 0x1;
pub const LABEL_INPUT_CELL: u8 = 0x2;
pub const LABEL_INPUT_CELL_SINCE: u8 = 0x3;
pub const LABEL_INPUT_OUTPOINT: u8 = 0x4;
pub const LABEL_END_OF_LIST: u8 = 0xF;

pub const MASK_CAPACITY: u8 = 0x01;
pub const MASK_TYPE_CODE_HASH: u8 = 0x02;
pub const MASK_TYPE_ARGS: u8 = 0x04;
pub const MASK_TYPE_HASH_TYPE: u8 = 0x08;
pub const MASK_LOCK_CODE_HASH: u8 = 0x10;
pub const MASK_LOCK_ARGS: u8 = 0x20;
pub const MASK_LOCK_HASH_TYPE: u8 = 0x40;
pub const MASK_DATA: u8 = 0x80;
pub const MASK_FULL: u8 = 0xFF;

pub const OUTPOINT_TX_HASH: u8 = 0x01;
pub const OUTPOINT_INDEX: u8 = 0x02;
pub const OUTPOINT_SINCE: u8 = 0x04;

/// A single 3-byte coverage instruction: `[label:4|index_hi:4][index_lo:8][mask:8]`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CoverageOp {
    pub label: u8,
    pub index: u16,
    pub mask: u8,
}

impl CoverageOp {
    fn parse(bytes: &[u8]) -> Self {
        let label = bytes[0] >> 4;
        let index_hi = u16::from(bytes[0] & 0x0F);
        let index_lo = u16::from(bytes[1]);
        CoverageOp {
            label,
            index: (index_hi << 8) | index_lo,
            mask: bytes[2],
        }
    }
}

/// Parses and interprets the sighash-coverage array at the front of `lock`,
/// driving `hasher` to absorb the selected transaction components in order.
/// Returns the number of bytes consumed (`3 * ops_count_including_terminator`).
pub fn run(lock: &[u8], hasher: &mut Hasher) -> Result<usize, Error> {
    let mut i = 0usize;
    loop {
        if (i + 1) * 3 > lock.len() {
            return Err(Error::InvalidLabel);
        }
        let op = CoverageOp::parse(&lock[i * 3..i * 3 + 3]);
        i += 1;

        #[cfg(feature = "log")]
        ckb_std::debug!(
            "coverage op dispatched: label={} index={} mask={:#x}",
            op.label,
            op.index,
            op.mask
        );

        match op.label {
            LABEL_END_OF_LIST => break,
            LABEL_SIGHASH_ALL => {
                let tx_hash = adapter::load_tx_hash()?;
                hasher.absorb(&tx_hash);
            }
            LABEL_OUTPUT => absorb_cell(hasher, Source::Output, op.index, op.mask)?,
            LABEL_INPUT_CELL => absorb_cell(hasher, Source::Input, op.index, op.mask)?,
            LABEL_INPUT_CELL_SINCE => {
                absorb_cell(hasher, Source::Input, op.index, op.mask)?;
                let since = load_since(op.index)?;
                hasher.absorb(&since);
            }
            LABEL_INPUT_OUTPOINT => absorb_outpoint(hasher, op.index, op.mask)?,
            _ => return Err(Error::InvalidLabel),
        }
    }
    Ok(i * 3)
}

fn load_since(index: u16) -> Result<[u8; 8], Error> {
    let mut buf = [0u8; 8];
    let len = adapter::load_input_by_field(&mut buf, 0, index as usize, Source::Input, InputField::Since)?;
    if len != 8 {
        return Err(Error::Syscall);
    }
    Ok(buf)
}

fn absorb_cell(hasher: &mut Hasher, source: Source, index: u16, mask: u8) -> Result<(), Error> {
    let index = index as usize;
    if mask == MASK_FULL {
        hasher.absorb_object(|buf, off| adapter::load_cell(buf, off, index, source))?;
        hasher.absorb_object(|buf, off| adapter::load_cell_data(buf, off, index, source))?;
        return Ok(());
    }

    if mask & MASK_CAPACITY != 0 {
        let mut buf = [0u8; 8];
        let len = adapter::load_cell_by_field(&mut buf, 0, index, source, CellField::Capacity)?;
        if len != 8 {
            return Err(Error::Syscall);
        }
        hasher.absorb(&buf);
    }

    let type_selector = (mask >> 1) & 0x7;
    if type_selector != 0 {
        absorb_script_field(hasher, index, source, CellField::Type, type_selector)?;
    }

    let lock_selector = (mask >> 4) & 0x7;
    if lock_selector != 0 {
        absorb_script_field(hasher, index, source, CellField::Lock, lock_selector)?;
    }

    if mask & MASK_DATA != 0 {
        hasher.absorb_object(|buf, off| adapter::load_cell_data(buf, off, index, source))?;
    }

    Ok(())
}

/// Loads a cell's type/lock script and absorbs the sub-fields named by
/// `selector` (a normalized 3-bit mask: `0x1` code_hash, `0x2` args, `0x4`
/// hash_type). Both the type-mask bits (`0x02/0x04/0x08`) and the lock-mask
/// bits (`0x10/0x20/0x40`) are folded into this same selector by their
/// respective callers, so there is exactly one place that knows how to read
/// a `Script`'s sub-fields.
fn absorb_script_field(
    hasher: &mut Hasher,
    index: usize,
    source: Source,
    field: CellField,
    selector: u8,
) -> Result<(), Error> {
    let mut buf = [0u8; adapter::SCRIPT_BUF];
    let len = match adapter::load_cell_by_field(&mut buf, 0, index, source, field) {
        Ok(len) if len <= buf.len() => len,
        Ok(_) | Err(SysError::LengthNotEnough(_)) => return Err(Error::ScriptTooLong),
        Err(SysError::ItemMissing) => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    let script = ScriptReader::from_slice(&buf[..len])?;
    if selector & 0x1 != 0 {
        hasher.absorb(script.code_hash().as_slice());
    }
    if selector & 0x2 != 0 {
        hasher.absorb(script.args().as_slice());
    }
    if selector & 0x4 != 0 {
        hasher.absorb(script.hash_type().as_slice());
    }
    Ok(())
}

fn absorb_outpoint(hasher: &mut Hasher, index: u16, mask: u8) -> Result<(), Error> {
    let index = index as usize;
    if mask == MASK_FULL {
        hasher.absorb_object(|buf, off| adapter::load_input(buf, off, index, Source::Input))?;
        return Ok(());
    }

    if mask & OUTPOINT_SINCE != 0 {
        let since = load_since(index as u16)?;
        hasher.absorb(&since);
    }

    if mask & (OUTPOINT_TX_HASH | OUTPOINT_INDEX) != 0 {
        let mut buf = [0u8; adapter::INPUT_BUF];
        let len = adapter::load_input_by_field(
            &mut buf,
            0,
            index,
            Source::Input,
            InputField::OutPoint,
        )?;
        let outpoint = OutPointReader::from_slice(&buf[..len])?;
        if mask & OUTPOINT_TX_HASH != 0 {
            hasher.absorb(outpoint.tx_hash().as_slice());
        }
        // The reference C lock re-reads `tx_hash` here due to a
        // variable-name bug in its outpoint branch; this absorbs the
        // outpoint's actual `index` field instead.
        if mask & OUTPOINT_INDEX != 0 {
            hasher.absorb(outpoint.index().as_slice());
        }
    }

    Ok(())
}
