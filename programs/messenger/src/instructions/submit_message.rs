use anchor_lang::prelude::*;
use crate::{contexts::SubmitMessage, rules::message_flags, witness::MapWitness};

pub fn handler(
    ctx: Context<SubmitMessage>,
    message: u64,
    address_witness: MapWitness,
    message_witness: MapWitness,
    nullifier_witness: MapWitness,
) -> Result<()> {
    let messenger_state = &mut ctx.accounts.messenger_state;

    msg!("📝 Processing message {} flags {:?}", message, message_flags(message));

    let added = messenger_state.submit_message(
        &ctx.accounts.sender.key(),
        message,
        &address_witness,
        &message_witness,
        &nullifier_witness,
    )?;

    emit!(added.clone());

    msg!("New message added: {}", added.message);

    Ok(())
}
