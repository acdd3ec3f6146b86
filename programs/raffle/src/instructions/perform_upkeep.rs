use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::SEED_RAFFLE;
use crate::error::RaffleError;
use crate::events::DrawRequested;
use crate::state::Raffle;

/// Accounts required to start a draw.
///
/// Ensures:
/// 1. The upkeep predicate holds right now, whoever the caller is.
/// 2. The randomness account is fresh and has not been revealed yet, so the
///    round commits to a value nobody can know in advance.
#[derive(Accounts)]
pub struct PerformUpkeep<'info> {
    /// Any account may trigger upkeep; it only pays the transaction fee.
    pub payer: Signer<'info>,

    /// The raffle state account.
    #[account(
        mut,
        seeds = [SEED_RAFFLE],
        bump = raffle.bump
    )]
    pub raffle: Account<'info, Raffle>,

    /// Randomness account from Switchboard.
    /// CHECK: The account's data is validated manually within the handler.
    pub randomness_account_data: UncheckedAccount<'info>,
}

/// Starts a draw if one is due.
///
/// The predicate is re-evaluated here rather than trusting the caller, so
/// automation (or anyone else) can only move the raffle into `Calculating`
/// when the interval has elapsed and the round has entries and funds. The
/// key of the committed randomness account becomes the identifier of the
/// outstanding request.
pub fn process_perform_upkeep(ctx: Context<PerformUpkeep>) -> Result<()> {
    let clock = Clock::get()?;

    let raffle = &mut ctx.accounts.raffle;
    require!(
        raffle.is_draw_due(clock.unix_timestamp),
        RaffleError::UpkeepNotNeeded
    );

    let randomness_data =
        RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
            .map_err(|_| RaffleError::InvalidRandomnessAccount)?;
    if randomness_data.seed_slot != clock.slot - 1 {
        return Err(RaffleError::RandomnessAlreadyRevealed.into());
    }

    let request_id = ctx.accounts.randomness_account_data.key();
    raffle.begin_draw(request_id, clock.unix_timestamp)?;

    emit!(DrawRequested { request_id });
    msg!("Draw requested: request_id={}", request_id);

    Ok(())
}
