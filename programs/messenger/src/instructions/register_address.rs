use anchor_lang::prelude::*;
use crate::{contexts::RegisterAddress, witness::MapWitness};

pub fn handler(ctx: Context<RegisterAddress>, witness: MapWitness) -> Result<()> {
    let messenger_state = &mut ctx.accounts.messenger_state;
    let root_before = messenger_state.address_root;

    let registered = messenger_state.register_address(
        &ctx.accounts.authority.key(),
        &ctx.accounts.participant.key(),
        &witness,
    )?;

    emit!(registered.clone());

    msg!("✅ Address registered!");
    msg!("   Participant: {}", registered.participant);
    msg!("   Root before: {:?}", root_before);
    msg!("   Root after: {:?}", messenger_state.address_root);
    msg!(
        "   Participants: {}/{}",
        registered.participant_count,
        messenger_state.capacity
    );

    Ok(())
}
