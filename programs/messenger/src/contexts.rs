use anchor_lang::prelude::*;
use crate::{constants::*, state::*};

/// Initialize the messenger registry
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Deployer, recorded as the registration admin
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Singleton state PDA - `init` makes a second initialization fail
    #[account(
        init,
        payer = admin,
        space = 8 + MessengerState::INIT_SPACE,
        seeds = [MESSENGER_STATE_SEED],
        bump
    )]
    pub messenger_state: Account<'info, MessengerState>,

    pub system_program: Program<'info, System>,
}

/// Approve a participant (admin-only when the registry is admin-gated)
#[derive(Accounts)]
pub struct RegisterAddress<'info> {
    /// Caller requesting the registration
    pub authority: Signer<'info>,

    /// CHECK: only the public key is read, as the identity being approved
    pub participant: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [MESSENGER_STATE_SEED],
        bump = messenger_state.bump
    )]
    pub messenger_state: Account<'info, MessengerState>,
}

/// Submit the sender's single message
#[derive(Accounts)]
pub struct SubmitMessage<'info> {
    /// Approved participant; its key is the submitting identity
    pub sender: Signer<'info>,

    #[account(
        mut,
        seeds = [MESSENGER_STATE_SEED],
        bump = messenger_state.bump
    )]
    pub messenger_state: Account<'info, MessengerState>,
}
