use anchor_lang::prelude::*;

#[error_code]
pub enum RaffleError {
    #[msg("Entry payment is below the entrance fee")]
    InsufficientPayment,
    #[msg("Raffle is not open for entries")]
    RaffleNotOpen,
    #[msg("Upkeep conditions are not met")]
    UpkeepNotNeeded,
    #[msg("Request does not match the pending randomness request")]
    UnknownRequest,
    #[msg("Prize payout could not be completed")]
    PayoutFailed,
    #[msg("Maximum number of entrants reached for this round")]
    RaffleFull,
    #[msg("Randomness has already been revealed")]
    RandomnessAlreadyRevealed,
    #[msg("Randomness has not been resolved yet")]
    RandomnessNotResolved,
    #[msg("Randomness account data could not be parsed")]
    InvalidRandomnessAccount,
    #[msg("Arithmetic overflow")]
    NumericalOverflow,
}
