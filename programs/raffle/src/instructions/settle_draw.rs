use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::SEED_RAFFLE;
use crate::error::RaffleError;
use crate::events::WinnerPicked;
use crate::state::Raffle;

/// Accounts required to settle a draw.
///
/// Ensures:
/// 1. The randomness account provided matches the pending request.
/// 2. The oracle has revealed a value for it.
/// 3. The prize is paid to the drawn winner and the round resets, all in
///    this one instruction.
#[derive(Accounts)]
pub struct SettleDraw<'info> {
    /// Any account may settle once the oracle has revealed; it only pays
    /// the transaction fee.
    pub payer: Signer<'info>,

    /// The raffle state account; also holds the pot being paid out.
    #[account(
        mut,
        seeds = [SEED_RAFFLE],
        bump = raffle.bump
    )]
    pub raffle: Account<'info, Raffle>,

    /// The randomness oracle account providing the revealed value.
    /// CHECK: The account's data is validated manually within the handler.
    pub randomness_account_data: UncheckedAccount<'info>,

    /// The entrant selected by the random value; receives the pot.
    /// CHECK: Verified against the drawn winner within the handler.
    #[account(mut)]
    pub winner: UncheckedAccount<'info>,
}

/// Settles the outstanding draw with the oracle's revealed value.
///
/// Steps performed:
/// 1. Reject any randomness account other than the pending one.
/// 2. Read the revealed value; fail if the oracle has not resolved yet.
/// 3. Pick `players[value % players.len()]` and reset the round.
/// 4. Move the pot from the raffle account to the winner.
///
/// A failed payout aborts the whole instruction, so the raffle stays in
/// `Calculating` with the request still pending and can be settled again.
pub fn process_settle_draw(ctx: Context<SettleDraw>) -> Result<()> {
    let clock = Clock::get()?;

    let request_id = ctx.accounts.randomness_account_data.key();
    require!(
        ctx.accounts.raffle.pending_request == Some(request_id),
        RaffleError::UnknownRequest
    );

    let randomness_data =
        RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
            .map_err(|_| RaffleError::InvalidRandomnessAccount)?;
    let revealed_random_value = randomness_data
        .get_value(&clock)
        .map_err(|_| RaffleError::RandomnessNotResolved)?;

    let mut raw = [0u8; 8];
    raw.copy_from_slice(&revealed_random_value[..8]);
    let random_value = u64::from_le_bytes(raw);

    let record = ctx
        .accounts
        .raffle
        .settle_draw(request_id, random_value, clock.unix_timestamp)?;

    require!(
        ctx.accounts.winner.key() == record.address,
        RaffleError::PayoutFailed
    );

    let raffle_info = ctx.accounts.raffle.to_account_info();
    let winner_info = ctx.accounts.winner.to_account_info();
    **raffle_info.try_borrow_mut_lamports()? = raffle_info
        .lamports()
        .checked_sub(record.amount_paid)
        .ok_or(RaffleError::PayoutFailed)?;
    **winner_info.try_borrow_mut_lamports()? = winner_info
        .lamports()
        .checked_add(record.amount_paid)
        .ok_or(RaffleError::PayoutFailed)?;

    emit!(WinnerPicked {
        winner: record.address,
        amount: record.amount_paid,
        timestamp: record.round_timestamp,
    });
    msg!(
        "Winner picked: {} paid {} lamports",
        record.address,
        record.amount_paid
    );

    Ok(())
}
