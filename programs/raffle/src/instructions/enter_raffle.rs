use anchor_lang::prelude::*;
use anchor_lang::system_program;

use crate::constants::SEED_RAFFLE;
use crate::events::EntryRecorded;
use crate::state::Raffle;

/// Accounts required to enter the raffle.
#[derive(Accounts)]
pub struct EnterRaffle<'info> {
    /// The entrant. Pays `amount` lamports into the pot.
    #[account(mut)]
    pub player: Signer<'info>,

    /// The raffle state account; also holds the pot.
    #[account(
        mut,
        seeds = [SEED_RAFFLE],
        bump = raffle.bump
    )]
    pub raffle: Account<'info, Raffle>,

    /// System program for the lamport transfer.
    pub system_program: Program<'info, System>,
}

/// Buys one ticket for the caller.
///
/// Steps performed:
/// 1. Validate the payment against the entrance fee and the raffle state.
/// 2. Record the entry and grow the pot.
/// 3. Transfer the payment from the player to the raffle account.
///
/// # Arguments
/// * `ctx` - Context containing EnterRaffle accounts
/// * `amount` - Payment in lamports; must be at least the entrance fee
pub fn process_enter_raffle(ctx: Context<EnterRaffle>, amount: u64) -> Result<()> {
    let raffle = &mut ctx.accounts.raffle;
    raffle.record_entry(ctx.accounts.player.key(), amount)?;

    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            system_program::Transfer {
                from: ctx.accounts.player.to_account_info(),
                to: raffle.to_account_info(),
            },
        ),
        amount,
    )?;

    emit!(EntryRecorded {
        player: ctx.accounts.player.key(),
        amount,
        entrant_count: raffle.players.len() as u64,
    });
    msg!(
        "Entry recorded: player={}, amount={}, entrants={}",
        ctx.accounts.player.key(),
        amount,
        raffle.players.len()
    );

    Ok(())
}
