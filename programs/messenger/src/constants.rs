// ============================================================================
// SEEDS FOR PDA DERIVATION
// ============================================================================

pub const MESSENGER_STATE_SEED: &[u8] = b"messenger_state";

// ============================================================================
// REGISTRY CONFIGURATION
// ============================================================================

/// Participant capacity used when the deployer does not override it
pub const DEFAULT_CAPACITY: u64 = 100;

/// Number of boolean flags packed into the low bits of a message
pub const MESSAGE_FLAG_COUNT: usize = 6;

// ============================================================================
// AUTHENTICATED MAP CONFIGURATION
// ============================================================================

/// Depth of every sparse Merkle map (one level per key bit)
pub const MAP_DEPTH: usize = 256;

/// Size in bytes of a map key, leaf value or root
pub const SCALAR_BYTES: usize = 32;

// ============================================================================
// DOMAIN SEPARATORS
// ============================================================================

pub const IDENTITY_KEY_DOMAIN: &[u8] = b"messenger:identity_key:v1";

pub const MAP_LEAF_DOMAIN: &[u8] = b"messenger:map_leaf:v1";

pub const MAP_NODE_DOMAIN: &[u8] = b"messenger:map_node:v1";
