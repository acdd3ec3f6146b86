/// Seed for the singleton raffle PDA.
pub const SEED_RAFFLE: &[u8] = b"raffle";

/// Upper bound on entries per round. The raffle account is sized for this
/// many player slots at initialization, so it doubles as the hard capacity
/// of the entrant list.
pub const MAX_ENTRANTS: usize = 200;
