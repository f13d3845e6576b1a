use anchor_lang::prelude::*;
use crate::{
    contexts::Initialize,
    state::{MapRoots, RegistryConfig},
};

pub fn handler(
    ctx: Context<Initialize>,
    initial_roots: MapRoots,
    config: RegistryConfig,
) -> Result<()> {
    let messenger_state = &mut ctx.accounts.messenger_state;

    messenger_state.initialize(
        ctx.accounts.admin.key(),
        initial_roots,
        config,
        ctx.bumps.messenger_state,
    )?;

    msg!("✅ Messenger initialized!");
    msg!("   Admin: {}", messenger_state.admin);
    msg!("   Capacity: {}", messenger_state.capacity);
    msg!("   Admin-gated registration: {}", messenger_state.admin_gated);

    Ok(())
}
