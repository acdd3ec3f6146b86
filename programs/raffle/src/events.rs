use anchor_lang::prelude::*;

/// Emitted for every accepted entry.
#[event]
pub struct EntryRecorded {
    pub player: Pubkey,
    pub amount: u64,
    pub entrant_count: u64,
}

/// Emitted when upkeep starts a draw and commits to a randomness request.
///
/// Off-chain automation watches for this event and settles the draw once the
/// oracle has revealed the value for `request_id`.
#[event]
pub struct DrawRequested {
    pub request_id: Pubkey,
}

/// Emitted when a winner has been paid and the round reset.
#[event]
pub struct WinnerPicked {
    pub winner: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}
