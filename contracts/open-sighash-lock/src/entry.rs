use ckb_open_sighash::verify;

use crate::error::Error;

pub fn main() -> Result<(), Error> {
    verify().map_err(Error::from)
}
