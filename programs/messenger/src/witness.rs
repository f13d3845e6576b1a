//! Authenticated key-value map commitments.
//!
//! Every logical map (addresses, messages, nullifiers) is a sparse Merkle
//! tree over a 256-bit key space. Only its root is committed on-chain; the
//! caller proves the current value at one key with a [`MapWitness`], and the
//! same witness yields the root after that key is overwritten.
//!
//! - leaf node:  `SHA-256(MAP_LEAF_DOMAIN || value)`
//! - inner node: `SHA-256(MAP_NODE_DOMAIN || left || right)`
//! - key bits are read MSB-first from the root downwards
//!
//! `SHA-256` comes from `solana-sha256-hasher`: the `sol_sha256` syscall
//! on-chain and the `sha2` crate on the host.

use anchor_lang::prelude::*;
use solana_sha256_hasher::hashv;

use crate::{constants::*, error::MessengerError};

/// A finite-field style scalar: map key, leaf value or root.
pub type Scalar = [u8; SCALAR_BYTES];

/// Leaf value of an unset key.
pub const EMPTY_VALUE: Scalar = scalar_from_u64(0);

/// Leaf value marking a key as present.
pub const TRUE_VALUE: Scalar = scalar_from_u64(1);

/// Embed an integer into a scalar (little-endian, zero padded).
pub const fn scalar_from_u64(value: u64) -> Scalar {
    let bytes = value.to_le_bytes();
    let mut out = [0u8; SCALAR_BYTES];
    let mut i = 0;
    while i < bytes.len() {
        out[i] = bytes[i];
        i += 1;
    }
    out
}

pub fn leaf_hash(value: &Scalar) -> Scalar {
    hashv(&[MAP_LEAF_DOMAIN, &value[..]]).to_bytes()
}

pub fn node_hash(left: &Scalar, right: &Scalar) -> Scalar {
    hashv(&[MAP_NODE_DOMAIN, &left[..], &right[..]]).to_bytes()
}

/// Bit of `key` that selects the child at `depth` (0 = below the root).
pub fn key_bit(key: &Scalar, depth: usize) -> bool {
    let byte = key[depth / 8];
    let shift = 7 - (depth % 8);
    (byte >> shift) & 0x01 == 1
}

/// Roots of empty subtrees, indexed by height (0 = leaf, `MAP_DEPTH` = root).
///
/// Built once per transition and shared by every witness it recomputes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmptySubtrees(Vec<Scalar>);

impl Default for EmptySubtrees {
    fn default() -> Self {
        Self::new()
    }
}

impl EmptySubtrees {
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(MAP_DEPTH + 1);
        let mut node = leaf_hash(&EMPTY_VALUE);
        nodes.push(node);
        for _ in 0..MAP_DEPTH {
            node = node_hash(&node, &node);
            nodes.push(node);
        }
        Self(nodes)
    }

    pub fn at(&self, height: usize) -> &Scalar {
        &self.0[height]
    }

    pub fn root(&self) -> &Scalar {
        self.at(MAP_DEPTH)
    }
}

/// Commitment of a map with no keys set.
pub fn empty_root() -> Scalar {
    *EmptySubtrees::new().root()
}

/// Compressed Merkle path for a single key.
///
/// Bit `h` of `sibling_bitmap` (byte `h / 8`, bit `h % 8`) is set when the
/// sibling at height `h` differs from the empty-subtree default; `siblings`
/// lists exactly those nodes, bottom-up.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct MapWitness {
    pub key: [u8; 32],
    pub sibling_bitmap: [u8; 32],
    pub siblings: Vec<[u8; 32]>,
}

impl MapWitness {
    pub fn has_sibling_at(&self, height: usize) -> bool {
        (self.sibling_bitmap[height / 8] >> (height % 8)) & 0x01 == 1
    }

    /// Root the map would have if `key` held `value`, together with `key`.
    pub fn compute_root_and_key(
        &self,
        value: &Scalar,
        empty: &EmptySubtrees,
    ) -> Result<(Scalar, Scalar)> {
        let expected: usize = self
            .sibling_bitmap
            .iter()
            .map(|byte| byte.count_ones() as usize)
            .sum();
        require!(
            expected == self.siblings.len(),
            MessengerError::MalformedWitness
        );

        let mut siblings = self.siblings.iter();
        let mut node = leaf_hash(value);

        for height in 0..MAP_DEPTH {
            let sibling = if self.has_sibling_at(height) {
                *siblings.next().ok_or(MessengerError::MalformedWitness)?
            } else {
                *empty.at(height)
            };

            node = if key_bit(&self.key, MAP_DEPTH - 1 - height) {
                node_hash(&sibling, &node)
            } else {
                node_hash(&node, &sibling)
            };
        }

        Ok((node, self.key))
    }
}
