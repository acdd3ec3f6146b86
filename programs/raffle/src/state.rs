use anchor_lang::prelude::*;
use solana_program::clock::UnixTimestamp;

use crate::constants::MAX_ENTRANTS;
use crate::error::RaffleError;

#[account]
#[derive(InitSpace)]
pub struct Raffle {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    /// The minimum payment (in lamports) required per entry.
    /// Fixed at initialization.
    pub entrance_fee: u64,

    /// The minimum time (in seconds) that must elapse between draws.
    /// Fixed at initialization.
    pub interval: i64,

    /// Whether the raffle is accepting entries or waiting on randomness.
    pub state: RaffleState,

    /// Every entry of the current round, in order. A player appears once
    /// per ticket bought, so duplicates are allowed.
    #[max_len(MAX_ENTRANTS)]
    pub players: Vec<Pubkey>,

    /// The total amount (in lamports) paid into the current round.
    /// Zeroed when the prize is paid out.
    pub pot_amount: u64,

    /// The UNIX timestamp of the last payout, or of initialization if no
    /// draw has settled yet.
    pub last_draw_timestamp: i64,

    /// The randomness account the current draw is committed to.
    /// `Some` exactly while `state` is `Calculating`.
    pub pending_request: Option<Pubkey>,

    /// The winner of the most recent round. Overwritten on every payout.
    pub recent_winner: Option<RecentWinner>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Default, Debug)]
pub enum RaffleState {
    /// Entries are accepted.
    #[default]
    Open,
    /// A randomness request is outstanding; entries are rejected.
    Calculating,
}

/// Record of the most recent payout.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug)]
pub struct RecentWinner {
    pub address: Pubkey,
    pub amount_paid: u64,
    pub round_timestamp: i64,
}

/// Whether a draw should start.
///
/// All four conditions are required: the raffle is open, the interval has
/// elapsed since the last draw, the pot holds funds, and at least one entry
/// exists.
pub fn upkeep_needed(
    state: RaffleState,
    pot_amount: u64,
    entrant_count: usize,
    elapsed: i64,
    interval: i64,
) -> bool {
    state == RaffleState::Open && elapsed >= interval && pot_amount > 0 && entrant_count > 0
}

impl Raffle {
    /// Validates and records one entry. The lamport transfer itself is the
    /// caller's responsibility; on any error the round is left untouched.
    pub fn record_entry(
        &mut self,
        player: Pubkey,
        amount: u64,
    ) -> std::result::Result<(), RaffleError> {
        if self.state != RaffleState::Open {
            return Err(RaffleError::RaffleNotOpen);
        }
        if amount < self.entrance_fee {
            return Err(RaffleError::InsufficientPayment);
        }
        if self.players.len() >= MAX_ENTRANTS {
            return Err(RaffleError::RaffleFull);
        }

        self.pot_amount = self
            .pot_amount
            .checked_add(amount)
            .ok_or(RaffleError::NumericalOverflow)?;
        self.players.push(player);
        Ok(())
    }

    pub fn is_draw_due(&self, now: UnixTimestamp) -> bool {
        upkeep_needed(
            self.state,
            self.pot_amount,
            self.players.len(),
            now.saturating_sub(self.last_draw_timestamp),
            self.interval,
        )
    }

    /// Starts a draw: transitions `Open -> Calculating` and records the
    /// randomness request the round is now committed to.
    ///
    /// Re-checks the upkeep predicate itself rather than trusting the
    /// caller, so a draw can never be forced early.
    pub fn begin_draw(
        &mut self,
        request_id: Pubkey,
        now: UnixTimestamp,
    ) -> std::result::Result<(), RaffleError> {
        if !self.is_draw_due(now) {
            return Err(RaffleError::UpkeepNotNeeded);
        }

        self.state = RaffleState::Calculating;
        self.pending_request = Some(request_id);
        Ok(())
    }

    /// Settles the outstanding draw with the revealed random value.
    ///
    /// Picks `players[random_value % players.len()]`, records it as the most
    /// recent winner and resets the round in one step: entries cleared, pot
    /// zeroed, timestamp stamped, state back to `Open`. Returns the payout
    /// record so the caller can move the lamports.
    pub fn settle_draw(
        &mut self,
        request_id: Pubkey,
        random_value: u64,
        now: UnixTimestamp,
    ) -> std::result::Result<RecentWinner, RaffleError> {
        match self.pending_request {
            Some(pending) if pending == request_id => {}
            _ => return Err(RaffleError::UnknownRequest),
        }

        // players cannot be empty while a request is pending
        let winner_index = random_value
            .checked_rem(self.players.len() as u64)
            .ok_or(RaffleError::UnknownRequest)? as usize;
        let record = RecentWinner {
            address: self.players[winner_index],
            amount_paid: self.pot_amount,
            round_timestamp: now,
        };

        self.recent_winner = Some(record);
        self.players.clear();
        self.pot_amount = 0;
        self.last_draw_timestamp = now;
        self.pending_request = None;
        self.state = RaffleState::Open;

        Ok(record)
    }

    /// The entrant at `index`, if any.
    pub fn player(&self, index: u64) -> Option<Pubkey> {
        self.players.get(index as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEE: u64 = 10;
    const INTERVAL: i64 = 30;
    const T0: i64 = 1_700_000_000;

    fn open_raffle() -> Raffle {
        Raffle {
            bump: 255,
            entrance_fee: FEE,
            interval: INTERVAL,
            state: RaffleState::Open,
            players: Vec::new(),
            pot_amount: 0,
            last_draw_timestamp: T0,
            pending_request: None,
            recent_winner: None,
        }
    }

    #[test]
    fn upkeep_needed_requires_every_condition() {
        for mask in 0u8..16 {
            let open = mask & 1 != 0;
            let elapsed_enough = mask & 2 != 0;
            let has_pot = mask & 4 != 0;
            let has_players = mask & 8 != 0;

            let state = if open {
                RaffleState::Open
            } else {
                RaffleState::Calculating
            };
            let pot = if has_pot { FEE } else { 0 };
            let entrants = if has_players { 3 } else { 0 };
            let elapsed = if elapsed_enough { INTERVAL } else { INTERVAL - 1 };

            assert_eq!(
                upkeep_needed(state, pot, entrants, elapsed, INTERVAL),
                open && elapsed_enough && has_pot && has_players,
                "state={state:?} pot={pot} entrants={entrants} elapsed={elapsed}",
            );
        }
    }

    #[test]
    fn entry_below_fee_is_rejected() {
        let mut raffle = open_raffle();
        let player = Pubkey::new_unique();

        for amount in [0, FEE - 1] {
            let result = raffle.record_entry(player, amount);
            assert!(matches!(result, Err(RaffleError::InsufficientPayment)));
        }
        assert!(raffle.players.is_empty());
        assert_eq!(raffle.pot_amount, 0);
    }

    #[test]
    fn entries_accumulate_in_order() {
        let mut raffle = open_raffle();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();

        raffle.record_entry(alice, FEE).unwrap();
        raffle.record_entry(bob, FEE + 5).unwrap();
        // a second ticket for the same player is a second entry
        raffle.record_entry(alice, FEE).unwrap();

        assert_eq!(raffle.players, vec![alice, bob, alice]);
        assert_eq!(raffle.pot_amount, 3 * FEE + 5);
        assert_eq!(raffle.player(1), Some(bob));
        assert_eq!(raffle.player(3), None);
    }

    #[test]
    fn entry_is_rejected_while_calculating() {
        let mut raffle = open_raffle();
        raffle.record_entry(Pubkey::new_unique(), FEE).unwrap();
        raffle
            .begin_draw(Pubkey::new_unique(), T0 + INTERVAL)
            .unwrap();

        // rejected whatever the payment, generous or short
        let pot_before = raffle.pot_amount;
        for amount in [FEE * 100, FEE - 1] {
            let result = raffle.record_entry(Pubkey::new_unique(), amount);
            assert!(matches!(result, Err(RaffleError::RaffleNotOpen)));
        }
        assert_eq!(raffle.players.len(), 1);
        assert_eq!(raffle.pot_amount, pot_before);
    }

    #[test]
    fn entry_is_rejected_when_round_is_full() {
        let mut raffle = open_raffle();
        for _ in 0..MAX_ENTRANTS {
            raffle.record_entry(Pubkey::new_unique(), FEE).unwrap();
        }

        let result = raffle.record_entry(Pubkey::new_unique(), FEE);

        assert!(matches!(result, Err(RaffleError::RaffleFull)));
        assert_eq!(raffle.players.len(), MAX_ENTRANTS);
    }

    #[test]
    fn entry_overflowing_the_pot_is_rejected() {
        let mut raffle = open_raffle();
        raffle.pot_amount = u64::MAX - FEE + 1;

        let result = raffle.record_entry(Pubkey::new_unique(), FEE);

        assert!(matches!(result, Err(RaffleError::NumericalOverflow)));
        assert!(raffle.players.is_empty());
    }

    #[test]
    fn begin_draw_is_rejected_until_upkeep_is_due() {
        let mut raffle = open_raffle();
        let request = Pubkey::new_unique();

        // no entries yet
        let result = raffle.begin_draw(request, T0 + INTERVAL);
        assert!(matches!(result, Err(RaffleError::UpkeepNotNeeded)));

        // entries, but the interval has not elapsed
        raffle.record_entry(Pubkey::new_unique(), FEE).unwrap();
        let result = raffle.begin_draw(request, T0 + INTERVAL - 1);
        assert!(matches!(result, Err(RaffleError::UpkeepNotNeeded)));

        assert_eq!(raffle.state, RaffleState::Open);
        assert_eq!(raffle.pending_request, None);
    }

    #[test]
    fn begin_draw_records_the_pending_request() {
        let mut raffle = open_raffle();
        raffle.record_entry(Pubkey::new_unique(), FEE).unwrap();
        let request = Pubkey::new_unique();

        raffle.begin_draw(request, T0 + INTERVAL).unwrap();

        assert_eq!(raffle.state, RaffleState::Calculating);
        assert_eq!(raffle.pending_request, Some(request));

        // only one request may be outstanding
        let result = raffle.begin_draw(Pubkey::new_unique(), T0 + INTERVAL);
        assert!(matches!(result, Err(RaffleError::UpkeepNotNeeded)));
        assert_eq!(raffle.pending_request, Some(request));
    }

    #[test]
    fn settle_rejects_requests_that_are_not_pending() {
        let mut raffle = open_raffle();
        let alice = Pubkey::new_unique();
        raffle.record_entry(alice, FEE).unwrap();
        let request = Pubkey::new_unique();
        raffle.begin_draw(request, T0 + INTERVAL).unwrap();

        for bogus in [Pubkey::default(), Pubkey::new_unique()] {
            let result = raffle.settle_draw(bogus, 7, T0 + INTERVAL + 1);
            assert!(matches!(result, Err(RaffleError::UnknownRequest)));
        }

        assert_eq!(raffle.state, RaffleState::Calculating);
        assert_eq!(raffle.players, vec![alice]);
        assert_eq!(raffle.pending_request, Some(request));
    }

    #[test]
    fn settle_rejects_when_no_request_is_pending() {
        let mut raffle = open_raffle();
        raffle.record_entry(Pubkey::new_unique(), FEE).unwrap();

        let result = raffle.settle_draw(Pubkey::new_unique(), 7, T0 + INTERVAL);

        assert!(matches!(result, Err(RaffleError::UnknownRequest)));
        assert_eq!(raffle.state, RaffleState::Open);
    }

    #[test]
    fn settle_pays_the_single_entrant_and_resets_the_round() {
        let mut raffle = open_raffle();
        let alice = Pubkey::new_unique();
        raffle.record_entry(alice, FEE).unwrap();
        assert_eq!(raffle.pot_amount, FEE);
        assert_eq!(raffle.players, vec![alice]);

        assert!(raffle.is_draw_due(T0 + INTERVAL));
        let request = Pubkey::new_unique();
        raffle.begin_draw(request, T0 + INTERVAL).unwrap();

        // 7 % 1 == 0, so the only entrant wins the whole pot
        let settled_at = T0 + INTERVAL + 5;
        let record = raffle.settle_draw(request, 7, settled_at).unwrap();

        assert_eq!(record.address, alice);
        assert_eq!(record.amount_paid, FEE);
        assert_eq!(record.round_timestamp, settled_at);

        assert_eq!(raffle.state, RaffleState::Open);
        assert!(raffle.players.is_empty());
        assert_eq!(raffle.pot_amount, 0);
        assert!(raffle.last_draw_timestamp > T0);
        assert_eq!(raffle.last_draw_timestamp, settled_at);
        assert_eq!(raffle.pending_request, None);
        assert_eq!(raffle.recent_winner, Some(record));
    }

    #[test]
    fn settle_rejects_a_replayed_request() {
        let mut raffle = open_raffle();
        raffle.record_entry(Pubkey::new_unique(), FEE).unwrap();
        let request = Pubkey::new_unique();
        raffle.begin_draw(request, T0 + INTERVAL).unwrap();
        raffle.settle_draw(request, 7, T0 + INTERVAL + 1).unwrap();

        // the pending request was cleared by the first settlement
        let result = raffle.settle_draw(request, 7, T0 + INTERVAL + 2);

        assert!(matches!(result, Err(RaffleError::UnknownRequest)));
        assert_eq!(raffle.state, RaffleState::Open);
    }

    #[test]
    fn settle_pays_the_full_pot_to_the_modulo_winner() {
        let fee = 25;
        for random_value in [0u64, 1, 2, 3, 6, 1_000_003] {
            let mut raffle = open_raffle();
            raffle.entrance_fee = fee;

            let players: Vec<Pubkey> = (0..4).map(|_| Pubkey::new_unique()).collect();
            for player in &players {
                raffle.record_entry(*player, fee).unwrap();
            }

            let request = Pubkey::new_unique();
            raffle.begin_draw(request, T0 + INTERVAL).unwrap();
            let record = raffle
                .settle_draw(request, random_value, T0 + INTERVAL + 1)
                .unwrap();

            assert_eq!(record.address, players[(random_value % 4) as usize]);
            assert_eq!(record.amount_paid, 4 * fee);
        }
    }
}
