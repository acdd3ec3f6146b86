use anchor_lang::prelude::*;

use crate::constants::SEED_RAFFLE;
use crate::state::Raffle;

#[derive(Accounts)]
pub struct CheckUpkeep<'info> {
    #[account(
        seeds = [SEED_RAFFLE],
        bump = raffle.bump
    )]
    pub raffle: Account<'info, Raffle>,
}

/// Read-only upkeep probe for off-chain automation. Returns whether a draw
/// should be started; never mutates the raffle.
pub fn process_check_upkeep(ctx: Context<CheckUpkeep>) -> Result<bool> {
    let clock = Clock::get()?;
    Ok(ctx.accounts.raffle.is_draw_due(clock.unix_timestamp))
}
