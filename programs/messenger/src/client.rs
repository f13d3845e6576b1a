//! Off-chain reference client.
//!
//! The program only stores map roots. A client keeps the full logical maps,
//! hands out witnesses for the key it is about to touch and mirrors every
//! accepted transition. When another proposal lands first, the committed
//! root moves and the witness fails with `StaleOrInvalidWitness`; the caller
//! records the newer transition and asks for a fresh witness.

use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::{
    constants::MAP_DEPTH,
    identity::derive_identity_key,
    state::MapRoots,
    witness::{
        key_bit, leaf_hash, node_hash, scalar_from_u64, EmptySubtrees, MapWitness, Scalar,
        EMPTY_VALUE, TRUE_VALUE,
    },
};

/// Full contents of one authenticated map.
///
/// Keys are ordered, so every subtree covers a contiguous run of entries.
#[derive(Clone, Debug)]
pub struct SparseMerkleMap {
    leaves: BTreeMap<Scalar, Scalar>,
    empty: EmptySubtrees,
}

impl Default for SparseMerkleMap {
    fn default() -> Self {
        Self::new()
    }
}

impl SparseMerkleMap {
    pub fn new() -> Self {
        Self {
            leaves: BTreeMap::new(),
            empty: EmptySubtrees::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn get(&self, key: &Scalar) -> Scalar {
        self.leaves.get(key).copied().unwrap_or(EMPTY_VALUE)
    }

    /// Write `value` at `key`; writing `EMPTY_VALUE` removes the entry.
    pub fn set(&mut self, key: Scalar, value: Scalar) {
        if value == EMPTY_VALUE {
            self.leaves.remove(&key);
        } else {
            self.leaves.insert(key, value);
        }
    }

    pub fn root(&self) -> Scalar {
        let entries = self.leaf_entries();
        self.subtree_root(&entries, 0)
    }

    /// Path for `key` against the current contents, whether or not it is set.
    pub fn witness(&self, key: &Scalar) -> MapWitness {
        let entries = self.leaf_entries();
        let mut witness = MapWitness {
            key: *key,
            ..MapWitness::default()
        };
        let mut top_down = Vec::new();
        let mut path = &entries[..];

        for depth in 0..MAP_DEPTH {
            if path.is_empty() {
                break;
            }
            let (left, right) = split_at_depth(path, depth);
            let (next, sibling) = if key_bit(key, depth) {
                (right, left)
            } else {
                (left, right)
            };

            if !sibling.is_empty() {
                let height = MAP_DEPTH - 1 - depth;
                witness.sibling_bitmap[height / 8] |= 1 << (height % 8);
                top_down.push(self.subtree_root(sibling, depth + 1));
            }
            path = next;
        }

        top_down.reverse();
        witness.siblings = top_down;
        witness
    }

    fn leaf_entries(&self) -> Vec<(Scalar, Scalar)> {
        self.leaves
            .iter()
            .map(|(key, value)| (*key, leaf_hash(value)))
            .collect()
    }

    fn subtree_root(&self, entries: &[(Scalar, Scalar)], depth: usize) -> Scalar {
        if entries.is_empty() {
            return *self.empty.at(MAP_DEPTH - depth);
        }
        if depth == MAP_DEPTH {
            return entries[0].1;
        }
        let (left, right) = split_at_depth(entries, depth);
        node_hash(
            &self.subtree_root(left, depth + 1),
            &self.subtree_root(right, depth + 1),
        )
    }
}

fn split_at_depth(
    entries: &[(Scalar, Scalar)],
    depth: usize,
) -> (&[(Scalar, Scalar)], &[(Scalar, Scalar)]) {
    let split = entries.partition_point(|(key, _)| !key_bit(key, depth));
    entries.split_at(split)
}

/// Witnesses needed by `submit_message` for one sender.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionWitnesses {
    pub address: MapWitness,
    pub message: MapWitness,
    pub nullifier: MapWitness,
}

/// Local mirror of the address, message and nullifier maps.
#[derive(Clone, Debug, Default)]
pub struct MessengerClient {
    addresses: SparseMerkleMap,
    messages: SparseMerkleMap,
    nullifiers: SparseMerkleMap,
}

impl MessengerClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roots of three empty maps, as passed to `initialize`.
    pub fn initial_roots() -> MapRoots {
        Self::new().roots()
    }

    pub fn roots(&self) -> MapRoots {
        MapRoots {
            address_root: self.addresses.root(),
            message_root: self.messages.root(),
            nullifier_root: self.nullifiers.root(),
        }
    }

    pub fn registration_witness(&self, participant: &Pubkey) -> Result<MapWitness> {
        let key = derive_identity_key(participant)?;
        Ok(self.addresses.witness(&key))
    }

    pub fn submission_witnesses(&self, sender: &Pubkey) -> Result<SubmissionWitnesses> {
        let key = derive_identity_key(sender)?;
        Ok(SubmissionWitnesses {
            address: self.addresses.witness(&key),
            message: self.messages.witness(&key),
            nullifier: self.nullifiers.witness(&key),
        })
    }

    /// Mirror an accepted `register_address`.
    pub fn record_registration(&mut self, participant: &Pubkey) -> Result<()> {
        let key = derive_identity_key(participant)?;
        self.addresses.set(key, TRUE_VALUE);
        Ok(())
    }

    /// Mirror an accepted `submit_message`.
    pub fn record_submission(&mut self, sender: &Pubkey, message: u64) -> Result<()> {
        let key = derive_identity_key(sender)?;
        self.messages.set(key, scalar_from_u64(message));
        self.nullifiers.set(key, TRUE_VALUE);
        Ok(())
    }

    pub fn is_registered(&self, participant: &Pubkey) -> Result<bool> {
        let key = derive_identity_key(participant)?;
        Ok(self.addresses.get(&key) == TRUE_VALUE)
    }

    pub fn has_submitted(&self, sender: &Pubkey) -> Result<bool> {
        let key = derive_identity_key(sender)?;
        Ok(self.nullifiers.get(&key) == TRUE_VALUE)
    }

    /// Message stored for `sender`, `None` while the slot is empty.
    pub fn message_of(&self, sender: &Pubkey) -> Result<Option<u64>> {
        let key = derive_identity_key(sender)?;
        let value = self.messages.get(&key);
        if value == EMPTY_VALUE {
            return Ok(None);
        }
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&value[..8]);
        Ok(Some(u64::from_le_bytes(bytes)))
    }

    pub fn participant_count(&self) -> usize {
        self.addresses.len()
    }
}
