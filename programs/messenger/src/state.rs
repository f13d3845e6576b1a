use anchor_lang::prelude::*;

use crate::constants::DEFAULT_CAPACITY;

// ============================================================================
// MESSENGER STATE - Committed registry state
// ============================================================================

#[account]
#[derive(InitSpace, Debug, Default, PartialEq, Eq)]
pub struct MessengerState {
    /// Authority allowed to register participants when `admin_gated` is set
    pub admin: Pubkey,

    /// Number of approved participants (never exceeds `capacity`)
    pub participant_count: u64,

    /// Maximum number of participants
    pub capacity: u64,

    /// Whether `register_address` is restricted to `admin`
    pub admin_gated: bool,

    /// Root of the identity key -> approved flag map
    pub address_root: [u8; 32],

    /// Root of the identity key -> message map
    pub message_root: [u8; 32],

    /// Root of the identity key -> has-submitted flag map
    pub nullifier_root: [u8; 32],

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl MessengerState {
    /// Snapshot of the three committed map roots.
    pub fn roots(&self) -> MapRoots {
        MapRoots {
            address_root: self.address_root,
            message_root: self.message_root,
            nullifier_root: self.nullifier_root,
        }
    }
}

// ============================================================================
// INSTRUCTION PARAMETERS
// ============================================================================

/// The three map commitments, as supplied at initialization or read back by
/// clients before building witnesses.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MapRoots {
    pub address_root: [u8; 32],
    pub message_root: [u8; 32],
    pub nullifier_root: [u8; 32],
}

/// Registration policy fixed at initialization.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    pub capacity: u64,
    pub admin_gated: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            admin_gated: true,
        }
    }
}

// ============================================================================
// EVENTS - Emitted for off-chain indexing
// ============================================================================

#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressRegistered {
    pub participant: Pubkey,
    pub key: [u8; 32],
    pub participant_count: u64,
}

#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageAdded {
    pub message: u64,
}
