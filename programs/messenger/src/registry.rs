//! State transitions of the message registry.
//!
//! Every transition checks its witnesses against the committed roots and
//! computes all new values before writing any field, so a failed call
//! leaves `MessengerState` untouched.

use anchor_lang::prelude::*;

use crate::{
    error::MessengerError,
    identity::derive_identity_key,
    rules::assert_rules,
    state::{AddressRegistered, MapRoots, MessageAdded, MessengerState, RegistryConfig},
    witness::{scalar_from_u64, EmptySubtrees, MapWitness, EMPTY_VALUE, TRUE_VALUE},
};

impl MessengerState {
    pub fn initialize(
        &mut self,
        admin: Pubkey,
        initial_roots: MapRoots,
        config: RegistryConfig,
        bump: u8,
    ) -> Result<()> {
        require!(config.capacity > 0, MessengerError::InvalidCapacity);

        self.admin = admin;
        self.participant_count = 0;
        self.capacity = config.capacity;
        self.admin_gated = config.admin_gated;
        self.address_root = initial_roots.address_root;
        self.message_root = initial_roots.message_root;
        self.nullifier_root = initial_roots.nullifier_root;
        self.bump = bump;
        Ok(())
    }

    pub fn authorize_registration(&self, authority: &Pubkey) -> Result<()> {
        if self.admin_gated {
            require_keys_eq!(*authority, self.admin, MessengerError::UnauthorizedAdmin);
        }
        Ok(())
    }

    /// Admit `participant` by flipping its address-map entry from empty to
    /// true. `witness` must prove the entry is currently empty.
    pub fn register_address(
        &mut self,
        authority: &Pubkey,
        participant: &Pubkey,
        witness: &MapWitness,
    ) -> Result<AddressRegistered> {
        self.authorize_registration(authority)?;
        let key = derive_identity_key(participant)?;
        let empty = EmptySubtrees::new();

        let (root_before, derived_key) = witness.compute_root_and_key(&EMPTY_VALUE, &empty)?;
        require!(
            root_before == self.address_root,
            MessengerError::StaleOrInvalidWitness
        );
        require!(derived_key == key, MessengerError::WitnessKeyMismatch);

        require!(
            self.participant_count < self.capacity,
            MessengerError::RegistryFull
        );
        let participant_count = self
            .participant_count
            .checked_add(1)
            .ok_or(MessengerError::ArithmeticOverflow)?;

        let (root_after, _) = witness.compute_root_and_key(&TRUE_VALUE, &empty)?;

        self.participant_count = participant_count;
        self.address_root = root_after;

        Ok(AddressRegistered {
            participant: *participant,
            key,
            participant_count,
        })
    }

    /// Record `message` for `sender` and spend its nullifier.
    ///
    /// The nullifier, membership and rule checks all pass before either the
    /// message root or the nullifier root moves, and both move together.
    pub fn submit_message(
        &mut self,
        sender: &Pubkey,
        message: u64,
        address_witness: &MapWitness,
        message_witness: &MapWitness,
        nullifier_witness: &MapWitness,
    ) -> Result<MessageAdded> {
        let key = derive_identity_key(sender)?;
        let empty = EmptySubtrees::new();

        let (nullifier_root, nullifier_key) =
            nullifier_witness.compute_root_and_key(&EMPTY_VALUE, &empty)?;
        require!(
            nullifier_root == self.nullifier_root,
            MessengerError::AlreadySubmitted
        );
        require!(nullifier_key == key, MessengerError::WitnessKeyMismatch);

        let (address_root, address_key) =
            address_witness.compute_root_and_key(&TRUE_VALUE, &empty)?;
        require!(
            address_root == self.address_root,
            MessengerError::NotApproved
        );
        require!(address_key == key, MessengerError::WitnessKeyMismatch);

        assert_rules(message)?;

        let (message_root, message_key) =
            message_witness.compute_root_and_key(&EMPTY_VALUE, &empty)?;
        require!(
            message_root == self.message_root,
            MessengerError::MessageSlotOccupied
        );
        require!(message_key == key, MessengerError::WitnessKeyMismatch);

        let (next_message_root, _) =
            message_witness.compute_root_and_key(&scalar_from_u64(message), &empty)?;
        let (next_nullifier_root, _) =
            nullifier_witness.compute_root_and_key(&TRUE_VALUE, &empty)?;

        self.message_root = next_message_root;
        self.nullifier_root = next_nullifier_root;

        Ok(MessageAdded { message })
    }
}
