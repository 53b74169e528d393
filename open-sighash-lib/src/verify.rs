//! Signature verification and top-level orchestration.
use ckb_std::ckb_types::packed::ScriptReader;
use molecule::prelude::Reader;
use secp256k1::{
    ecdsa::{RecoverableSignature, RecoveryId},
    Message, Secp256k1,
};

use crate::{adapter, error::Error, hasher::Hasher, witness};

const ARGS_LEN: usize = 20;

/// Recovers the compressed public key that produced `signature` over
/// `message`, and returns its blake160 hash (first 20 bytes of
/// `blake2b_256(compressed_pubkey)`).
pub fn recover_pubkey_hash(
    message: &[u8; 32],
    signature: &[u8; witness::SIGNATURE_LEN],
) -> Result<[u8; ARGS_LEN], Error> {
    let recid =
        RecoveryId::from_i32(signature[64] as i32).map_err(|_| Error::SecpParseSignature)?;
    let recoverable = RecoverableSignature::from_compact(&signature[0..64], recid)
        .map_err(|_| Error::SecpParseSignature)?;

    let secp = Secp256k1::new();
    let msg = Message::from_digest(*message);
    let pubkey = secp
        .recover_ecdsa(&msg, &recoverable)
        .map_err(|_| Error::SecpRecoverPubkey)?;

    let compressed = pubkey.serialize();
    let hash = ckb_hash::blake2b_256(compressed.as_slice());
    let mut out = [0u8; ARGS_LEN];
    out.copy_from_slice(&hash[..ARGS_LEN]);
    Ok(out)
}

/// Loads the currently executing script's `Args` and checks it is exactly
/// 20 bytes.
fn load_pubkey_hash_arg() -> Result<[u8; ARGS_LEN], Error> {
    let mut buf = [0u8; adapter::SCRIPT_BUF];
    let len = adapter::load_script(&mut buf)?;
    let script = ScriptReader::from_slice(&buf[..len])?;
    let args = script.args().raw_data();
    if args.len() != ARGS_LEN {
        return Err(Error::ArgumentsLen);
    }
    let mut out = [0u8; ARGS_LEN];
    out.copy_from_slice(args);
    Ok(out)
}

/// The full predicate: builds the signing digest (mandatory group-input
/// prefix, caller-selected coverage, witness finalization), recovers the
/// signer's public key and compares its blake160 hash against the script's
/// `Args`.
pub fn verify() -> Result<(), Error> {
    let mut hasher = Hasher::new();
    witness::hash_group_inputs(&mut hasher)?;
    let (message, signature) = witness::finalize_message(hasher)?;

    let recovered = recover_pubkey_hash(&message, &signature)?;
    let expected = load_pubkey_hash_arg()?;

    if recovered != expected {
        return Err(Error::PubkeyBlake160Hash);
    }
    #[cfg(feature = "log")]
    ckb_std::debug!("signature verified, blake160(pubkey) = {:02x?}", recovered);
    Ok(())
}
