//! Structural validity rules for a message.
//!
//! The low `MESSAGE_FLAG_COUNT` bits of a message are read as flags 1..=6
//! (bit 0 is flag 1):
//!
//! 1. if flag 1 is set, every other flag must be clear
//! 2. if flag 2 is set, flag 3 must be set
//! 3. if flag 4 is set, flags 5 and 6 must be clear
//!
//! Higher bits are carried in the message but not constrained.

use anchor_lang::prelude::*;

use crate::{constants::MESSAGE_FLAG_COUNT, error::MessengerError};

pub type MessageFlags = [bool; MESSAGE_FLAG_COUNT];

/// Decompose the low bits of `message`, least significant first.
pub fn message_flags(message: u64) -> MessageFlags {
    let mut flags = [false; MESSAGE_FLAG_COUNT];
    for (i, flag) in flags.iter_mut().enumerate() {
        *flag = (message >> i) & 1 == 1;
    }
    flags
}

pub fn assert_rules(message: u64) -> Result<()> {
    let flags = message_flags(message);
    assert_rule_1(&flags)?;
    assert_rule_2(&flags)?;
    assert_rule_3(&flags)?;
    Ok(())
}

fn assert_rule_1(flags: &MessageFlags) -> Result<()> {
    for other in &flags[1..] {
        assert_if_first_not_second(flags[0], *other, MessengerError::Rule1Violation)?;
    }
    Ok(())
}

fn assert_rule_2(flags: &MessageFlags) -> Result<()> {
    assert_if_first_then_second(flags[1], flags[2], MessengerError::Rule2Violation)
}

fn assert_rule_3(flags: &MessageFlags) -> Result<()> {
    assert_if_first_not_second(flags[3], flags[4], MessengerError::Rule3Violation)?;
    assert_if_first_not_second(flags[3], flags[5], MessengerError::Rule3Violation)
}

fn assert_if_first_then_second(first: bool, second: bool, violation: MessengerError) -> Result<()> {
    if !first || second {
        Ok(())
    } else {
        Err(violation.into())
    }
}

fn assert_if_first_not_second(first: bool, second: bool, violation: MessengerError) -> Result<()> {
    if !first || !second {
        Ok(())
    } else {
        Err(violation.into())
    }
}
