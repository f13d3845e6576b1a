use anchor_lang::prelude::*;
use solana_sha256_hasher::hashv;

use crate::{constants::IDENTITY_KEY_DOMAIN, error::MessengerError, witness::Scalar};

/// Map key shared by the address, message and nullifier maps for `identity`.
///
/// The default (all-zero) public key stands for "no identity" and is
/// rejected rather than hashed.
pub fn derive_identity_key(identity: &Pubkey) -> Result<Scalar> {
    require!(
        *identity != Pubkey::default(),
        MessengerError::EmptyIdentity
    );
    Ok(hashv(&[IDENTITY_KEY_DOMAIN, identity.as_ref()]).to_bytes())
}
