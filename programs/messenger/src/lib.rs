pub mod constants;
pub mod contexts;
pub mod error;
pub mod identity;
pub mod instructions;
pub mod registry;
pub mod rules;
pub mod state;
pub mod witness;

#[cfg(not(target_os = "solana"))]
pub mod client;

use anchor_lang::prelude::*;

pub use contexts::*;
pub use error::*;
pub use state::*;
pub use witness::MapWitness;

declare_id!("CF8G1pe3RKnpKPo7cBBcRAcPoA4ZH4E5WM3sHxEpGngE");

/// zk-Messenger: a bounded bulletin board where each approved participant
/// may post exactly one message.
///
/// - Approved addresses, messages and nullifiers live off-chain in sparse
///   Merkle maps; only their roots are stored here
/// - Every write carries a witness that is checked against the committed
///   root before the new root is computed from it
/// - A nullifier per participant makes the single submission final
/// - Messages must satisfy three structural flag rules
#[program]
pub mod messenger {
    use super::*;

    /// Initialize the registry with the roots of three empty maps
    pub fn initialize(
        ctx: Context<Initialize>,
        initial_roots: MapRoots,
        config: RegistryConfig,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, initial_roots, config)
    }

    /// Approve a participant (admin-only when the registry is admin-gated)
    pub fn register_address(ctx: Context<RegisterAddress>, witness: MapWitness) -> Result<()> {
        instructions::register_address::handler(ctx, witness)
    }

    /// Post the sender's single message
    pub fn submit_message(
        ctx: Context<SubmitMessage>,
        message: u64,
        address_witness: MapWitness,
        message_witness: MapWitness,
        nullifier_witness: MapWitness,
    ) -> Result<()> {
        instructions::submit_message::handler(
            ctx,
            message,
            address_witness,
            message_witness,
            nullifier_witness,
        )
    }
}
