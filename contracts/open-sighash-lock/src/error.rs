use ckb_open_sighash::Error as VerifyError;
use ckb_std::error::SysError;

/// Negative exit codes reported by this script, on top of CKB's own
/// positive syscall codes (propagated verbatim when no dedicated code
/// applies).
#[repr(i8)]
pub enum Error {
    IndexOutOfBound = 1,
    ItemMissing = 2,
    LengthNotEnough = 3,
    Encoding = 4,

    ArgumentsLen = -1,
    MoleculeEncoding = -2,
    Syscall = -3,

    SecpParseSignature = -11,
    SecpRecoverPubkey = -12,
    SecpSerializePubkey = -13,

    ScriptTooLong = -21,
    WitnessSize = -22,

    PubkeyBlake160Hash = -31,

    InvalidLabel = -50,
    InvalidMask = -51,
}

impl From<SysError> for Error {
    fn from(err: SysError) -> Self {
        match err {
            SysError::IndexOutOfBound => Self::IndexOutOfBound,
            SysError::ItemMissing => Self::ItemMissing,
            SysError::LengthNotEnough(_) => Self::LengthNotEnough,
            SysError::Encoding => Self::Encoding,
            SysError::Unknown(err_code) => panic!("unexpected sys error {}", err_code),
        }
    }
}

impl From<VerifyError> for Error {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::Sys(e) => e.into(),
            VerifyError::Encoding => Self::MoleculeEncoding,
            VerifyError::ArgumentsLen => Self::ArgumentsLen,
            VerifyError::Syscall => Self::Syscall,
            VerifyError::ScriptTooLong => Self::ScriptTooLong,
            VerifyError::WitnessSize => Self::WitnessSize,
            VerifyError::InvalidLabel => Self::InvalidLabel,
            VerifyError::InvalidMask => Self::InvalidMask,
            VerifyError::SecpParseSignature => Self::SecpParseSignature,
            VerifyError::SecpRecoverPubkey => Self::SecpRecoverPubkey,
            VerifyError::SecpSerializePubkey => Self::SecpSerializePubkey,
            VerifyError::PubkeyBlake160Hash => Self::PubkeyBlake160Hash,
        }
    }
}
