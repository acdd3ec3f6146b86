use anchor_lang::prelude::*;

use crate::constants::SEED_RAFFLE;
use crate::state::{Raffle, RaffleState};

/// Accounts required to initialize the raffle.
/// This sets up the singleton raffle account with its immutable config.
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// The account paying for account creation.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The raffle state account holding config and round state.
    #[account(
        init,
        payer = payer,
        space = 8 + Raffle::INIT_SPACE,
        seeds = [SEED_RAFFLE],
        bump
    )]
    pub raffle: Account<'info, Raffle>,

    /// System program to create accounts.
    pub system_program: Program<'info, System>,
}

/// Initializes the raffle: open for entries, no entrants, and the draw
/// timer started at the current block time. `entrance_fee` and `interval`
/// are fixed for the life of the account.
///
/// # Arguments
/// * `ctx` - Context holding the Initialize accounts
/// * `entrance_fee` - Minimum payment per entry, in lamports
/// * `interval` - Minimum seconds between draws
pub fn process_initialize(ctx: Context<Initialize>, entrance_fee: u64, interval: i64) -> Result<()> {
    let clock = Clock::get()?;

    let raffle = &mut ctx.accounts.raffle;
    raffle.bump = ctx.bumps.raffle;
    raffle.entrance_fee = entrance_fee;
    raffle.interval = interval;
    raffle.state = RaffleState::Open;
    raffle.players = Vec::new();
    raffle.pot_amount = 0;
    raffle.last_draw_timestamp = clock.unix_timestamp;
    raffle.pending_request = None;
    raffle.recent_winner = None;

    msg!(
        "Raffle initialized: fee={} lamports, interval={}s",
        entrance_fee,
        interval
    );
    Ok(())
}
