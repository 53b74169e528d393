use ckb_std::error::SysError;
use molecule::error::VerificationError;

/// Verification errors, independent of the final `i8` exit code a contract
/// reports. The contract crate owns that mapping (see its own `error.rs`),
/// since the exact negative codes are a property of the deployed script,
/// not of this library.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Error {
    /// Host syscall failed or returned an unexpected length/index. Carries
    /// the raw `SysError` so callers can decide whether it is a loop
    /// terminator (`IndexOutOfBound`) or fatal.
    Sys(SysError),
    /// Molecule structural verification failed, or a required field
    /// (`WitnessArgs.lock`) was absent.
    Encoding,
    /// `LockBytes.size` didn't satisfy `3 * ops_count + 65`, or `Args.size != 20`.
    ArgumentsLen,
    /// A host read succeeded but reported a length the protocol didn't
    /// expect (e.g. tx hash != 32 bytes).
    Syscall,
    /// The currently executing script exceeds the 32 KiB script buffer.
    ScriptTooLong,
    /// A witness exceeds the 32 KiB witness buffer.
    WitnessSize,
    /// An unknown `CoverageOp` label, or a truncated op array.
    InvalidLabel,
    /// Reserved for a future mask-validation rule; no path in the current
    /// coverage language triggers it (unknown mask bits are ignored, not
    /// rejected).
    InvalidMask,
    /// The 65-byte seal didn't parse as a compact-recoverable signature.
    SecpParseSignature,
    /// Public-key recovery against the digest failed.
    SecpRecoverPubkey,
    /// Compressed serialization of the recovered key failed.
    SecpSerializePubkey,
    /// The recovered key's blake160 hash didn't match the script args.
    PubkeyBlake160Hash,
}

impl From<SysError> for Error {
    fn from(e: SysError) -> Self {
        Error::Sys(e)
    }
}

impl From<VerificationError> for Error {
    fn from(_: VerificationError) -> Self {
        Error::Encoding
    }
}
