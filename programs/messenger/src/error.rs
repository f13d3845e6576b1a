use anchor_lang::prelude::*;

#[error_code]
pub enum MessengerError {
    #[msg("Witness root does not match the committed map root")]
    StaleOrInvalidWitness,

    #[msg("Witness key does not match the key derived from the identity")]
    WitnessKeyMismatch,

    #[msg("Registry is full - maximum capacity reached")]
    RegistryFull,

    #[msg("Sender has already submitted a message")]
    AlreadySubmitted,

    #[msg("Sender is not an approved participant")]
    NotApproved,

    #[msg("Message slot for this sender is already occupied")]
    MessageSlotOccupied,

    #[msg("Rule 1 - Flag 1 is not the only 'true' flag")]
    Rule1Violation,

    #[msg("Rule 2 - Flag 2 is set but flag 3 is not")]
    Rule2Violation,

    #[msg("Rule 3 - Flag 4 is set together with flag 5 or flag 6")]
    Rule3Violation,

    #[msg("Identity is empty")]
    EmptyIdentity,

    #[msg("Only the admin can register new addresses")]
    UnauthorizedAdmin,

    #[msg("Registry capacity must be greater than zero")]
    InvalidCapacity,

    #[msg("Map witness sibling bitmap does not match its sibling list")]
    MalformedWitness,

    #[msg("Arithmetic overflow in participant counter")]
    ArithmeticOverflow,
}

impl MessengerError {
    /// Number of the structural message rule this error reports, if any.
    pub fn rule_number(&self) -> Option<u8> {
        match self {
            MessengerError::Rule1Violation => Some(1),
            MessengerError::Rule2Violation => Some(2),
            MessengerError::Rule3Violation => Some(3),
            _ => None,
        }
    }
}
