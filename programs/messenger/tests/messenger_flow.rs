//! End-to-end registry flows driven through the state transitions and the
//! reference client, the way a deployed program and its users interact.

use anchor_lang::prelude::Pubkey;
use anchor_lang::Result;
use messenger::{
    client::MessengerClient,
    constants::DEFAULT_CAPACITY,
    identity::derive_identity_key,
    witness::{empty_root, TRUE_VALUE},
    MessageAdded, MessengerError, MessengerState, RegistryConfig,
};
use proptest::prelude::*;

// =============================================================================
// LOCAL HARNESS
// =============================================================================

struct LocalMessenger {
    state: MessengerState,
    client: MessengerClient,
    events: Vec<MessageAdded>,
}

impl LocalMessenger {
    fn deploy(config: RegistryConfig) -> Self {
        let mut state = MessengerState::default();
        state
            .initialize(admin(), MessengerClient::initial_roots(), config, 254)
            .unwrap();
        Self {
            state,
            client: MessengerClient::new(),
            events: Vec::new(),
        }
    }

    fn register(&mut self, participant: &Pubkey) -> Result<()> {
        let witness = self.client.registration_witness(participant)?;
        self.state.register_address(&admin(), participant, &witness)?;
        self.client.record_registration(participant)
    }

    fn submit(&mut self, sender: &Pubkey, message: u64) -> Result<()> {
        let w = self.client.submission_witnesses(sender)?;
        let added = self
            .state
            .submit_message(sender, message, &w.address, &w.message, &w.nullifier)?;
        self.events.push(added);
        self.client.record_submission(sender, message)
    }
}

fn admin() -> Pubkey {
    Pubkey::new_from_array([0xAA; 32])
}

fn participant(index: u32) -> Pubkey {
    let mut bytes = [0x11; 32];
    bytes[..4].copy_from_slice(&index.to_le_bytes());
    Pubkey::new_from_array(bytes)
}

fn error(expected: MessengerError) -> anchor_lang::error::Error {
    anchor_lang::error::Error::from(expected)
}

fn satisfies_rules(message: u64) -> bool {
    let bit = |i: u32| (message >> i) & 1 == 1;
    let rule_1 = !bit(0) || (1..6).all(|i| !bit(i));
    let rule_2 = !bit(1) || bit(2);
    let rule_3 = !bit(3) || (!bit(4) && !bit(5));
    rule_1 && rule_2 && rule_3
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn scenario_a_initialize_with_empty_roots() {
    let board = LocalMessenger::deploy(RegistryConfig::default());
    assert_eq!(board.state.participant_count, 0);
    assert_eq!(board.state.capacity, DEFAULT_CAPACITY);
    assert_eq!(board.state.admin, admin());
    assert_eq!(board.state.address_root, empty_root());
    assert_eq!(board.state.message_root, empty_root());
    assert_eq!(board.state.nullifier_root, empty_root());
}

#[test]
fn scenario_b_three_registrations() {
    let mut board = LocalMessenger::deploy(RegistryConfig::default());
    for i in 0..3 {
        board.register(&participant(i)).unwrap();
    }
    assert_eq!(board.state.participant_count, 3);

    let mut expected = messenger::client::SparseMerkleMap::new();
    for i in 0..3 {
        expected.set(derive_identity_key(&participant(i)).unwrap(), TRUE_VALUE);
    }
    assert_eq!(board.state.address_root, expected.root());
}

#[test]
fn scenario_c_single_submission() {
    let mut board = LocalMessenger::deploy(RegistryConfig::default());
    let alice = participant(1);
    board.register(&alice).unwrap();

    board.submit(&alice, 0b000001).unwrap();
    assert_eq!(board.events, vec![MessageAdded { message: 1 }]);
    assert_eq!(board.client.message_of(&alice).unwrap(), Some(1));
    assert_eq!(board.state.roots(), board.client.roots());

    let err = board.submit(&alice, 0b000001).unwrap_err();
    assert_eq!(err, error(MessengerError::AlreadySubmitted));
    assert_eq!(board.events.len(), 1);
}

#[test]
fn scenario_d_rule_two_violation_changes_nothing() {
    let mut board = LocalMessenger::deploy(RegistryConfig::default());
    let alice = participant(1);
    board.register(&alice).unwrap();
    let before = board.state.clone();

    let err = board.submit(&alice, 0b000010).unwrap_err();
    assert_eq!(err, error(MessengerError::Rule2Violation));
    assert_eq!(board.state, before);
    assert!(board.events.is_empty());
    assert!(!board.client.has_submitted(&alice).unwrap());
}

#[test]
fn scenario_e_unregistered_sender() {
    let mut board = LocalMessenger::deploy(RegistryConfig::default());
    board.register(&participant(1)).unwrap();

    let err = board.submit(&participant(2), 0).unwrap_err();
    assert_eq!(err, error(MessengerError::NotApproved));
}

#[test]
fn registry_fills_at_capacity() {
    let mut board = LocalMessenger::deploy(RegistryConfig::default());
    for i in 0..DEFAULT_CAPACITY as u32 {
        board.register(&participant(i)).unwrap();
    }
    let err = board.register(&participant(DEFAULT_CAPACITY as u32)).unwrap_err();
    assert_eq!(err, error(MessengerError::RegistryFull));
    assert_eq!(board.state.participant_count, DEFAULT_CAPACITY);
}

#[test]
fn concurrent_proposals_race_on_the_root() {
    let mut board = LocalMessenger::deploy(RegistryConfig::default());
    let alice = participant(1);
    let bob = participant(2);
    board.register(&alice).unwrap();
    board.register(&bob).unwrap();

    // Both witnesses are built against the same nullifier root.
    let alice_w = board.client.submission_witnesses(&alice).unwrap();
    let bob_w = board.client.submission_witnesses(&bob).unwrap();

    board
        .state
        .submit_message(&alice, 1, &alice_w.address, &alice_w.message, &alice_w.nullifier)
        .unwrap();
    board.client.record_submission(&alice, 1).unwrap();

    let err = board
        .state
        .submit_message(&bob, 4, &bob_w.address, &bob_w.message, &bob_w.nullifier)
        .unwrap_err();
    assert_eq!(err, error(MessengerError::AlreadySubmitted));

    // Retry with witnesses rebuilt against the new roots.
    board.submit(&bob, 4).unwrap();
    assert_eq!(board.state.roots(), board.client.roots());
}

#[test]
fn open_registry_accepts_any_authority() {
    let mut board = LocalMessenger::deploy(RegistryConfig {
        capacity: 5,
        admin_gated: false,
    });
    let alice = participant(1);
    let witness = board.client.registration_witness(&alice).unwrap();
    board
        .state
        .register_address(&alice, &alice, &witness)
        .unwrap();
    assert_eq!(board.state.participant_count, 1);
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Property: the count saturates at capacity and every extra attempt is RegistryFull
    #[test]
    fn count_never_exceeds_capacity(capacity in 1u64..6, attempts in 0u32..10) {
        let mut board = LocalMessenger::deploy(RegistryConfig { capacity, admin_gated: true });
        for i in 0..attempts {
            let result = board.register(&participant(i));
            if u64::from(i) < capacity {
                prop_assert!(result.is_ok());
            } else {
                prop_assert_eq!(result.unwrap_err(), error(MessengerError::RegistryFull));
            }
            prop_assert!(board.state.participant_count <= capacity);
        }
        prop_assert_eq!(board.state.participant_count, u64::from(attempts).min(capacity));
    }

    /// Property: at most one submission per identity succeeds
    #[test]
    fn one_submission_per_identity(first in 0u64..64, second in 0u64..64) {
        let mut board = LocalMessenger::deploy(RegistryConfig::default());
        let alice = participant(7);
        board.register(&alice).unwrap();

        let accepted = board.submit(&alice, first).is_ok();
        prop_assert_eq!(accepted, satisfies_rules(first));

        let retry = board.submit(&alice, second);
        if accepted {
            prop_assert_eq!(retry.unwrap_err(), error(MessengerError::AlreadySubmitted));
        } else {
            prop_assert_eq!(retry.is_ok(), satisfies_rules(second));
        }
        prop_assert!(board.events.len() <= 1);
    }

    /// Property: a rejected submission leaves every committed field unchanged
    #[test]
    fn failed_submission_is_atomic(message in any::<u64>()) {
        let mut board = LocalMessenger::deploy(RegistryConfig::default());
        let alice = participant(3);
        board.register(&alice).unwrap();
        let before = board.state.clone();

        if board.submit(&alice, message).is_err() {
            prop_assert!(!satisfies_rules(message));
            prop_assert_eq!(&board.state, &before);
        } else {
            prop_assert_eq!(board.state.address_root, before.address_root);
            prop_assert_ne!(board.state.nullifier_root, before.nullifier_root);
        }
    }

    /// Property: equal logical maps give equal roots regardless of history
    #[test]
    fn roots_are_deterministic(indices in prop::collection::btree_set(0u32..1000, 1..8)) {
        let ordered: Vec<u32> = indices.iter().copied().collect();
        let mut forward = LocalMessenger::deploy(RegistryConfig::default());
        let mut backward = LocalMessenger::deploy(RegistryConfig::default());

        for i in &ordered {
            forward.register(&participant(*i)).unwrap();
        }
        for i in ordered.iter().rev() {
            backward.register(&participant(*i)).unwrap();
        }

        prop_assert_eq!(forward.state.address_root, backward.state.address_root);
        prop_assert_eq!(forward.state.address_root, forward.client.roots().address_root);
    }
}
