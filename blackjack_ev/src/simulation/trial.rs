use blackjack_ev_macros::allowed_phase;
use rand::Rng;

use crate::{check_up_card, BlackjackError, Card, Deck, Hand, Rank, Rule};

const DEALER_STAND_TOTAL: u8 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialPhase {
    Shuffle,
    PlayerPlay,
    DealerPlay,
    Summary,
    Restore,
}

/// Result of a trial from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialResult {
    Win,
    Push,
    Lose,
}

/// What the player does in every trial.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerSpot {
    /// Stands on a fixed total without holding any cards.
    StandOn(u8),
    /// Takes exactly one card on the hand, then stands.
    HitOnce(Hand),
}

/// A deck, a dealer hand with its up card, and a player spot that are reused
/// across trials. Every trial goes through the phases in order and puts all
/// dealt cards back into the deck at the end.
#[derive(Debug, Clone)]
pub struct TrialTable {
    current_trial_phase: TrialPhase,
    deck: Deck,
    dealer_hand: Hand,
    player: PlayerSpot,
    player_cards_before_trial: usize,
}

impl TrialTable {
    /// Takes the dealer up card and the player's cards out of a fresh deck.
    pub fn new(rule: &Rule, player: PlayerSpot, up_card: u8) -> Result<TrialTable, BlackjackError> {
        let up_card = check_up_card(up_card)?;
        let mut deck = Deck::new(rule.number_of_decks)?;

        let player = match player {
            PlayerSpot::StandOn(total) => {
                if !(4..=21).contains(&total) {
                    return Err(BlackjackError::InvalidPlayerTotal(total));
                }
                PlayerSpot::StandOn(total)
            }
            PlayerSpot::HitOnce(hand) => {
                if hand.is_empty() || hand.is_bust() {
                    return Err(BlackjackError::InvalidPlayerTotal(hand.value()));
                }
                let mut dealt = Hand::new();
                for card in hand.cards() {
                    dealt.add_card(deck.remove_card(card)?);
                }
                PlayerSpot::HitOnce(dealt)
            }
        };
        let player_cards_before_trial = match &player {
            PlayerSpot::StandOn(_) => 0,
            PlayerSpot::HitOnce(hand) => hand.len(),
        };

        let rank = Rank::from_value(up_card).ok_or(BlackjackError::InvalidUpCard(up_card))?;
        let mut dealer_hand = Hand::new();
        dealer_hand.add_card(deck.remove_card(&Card::new(rank, None))?);

        Ok(TrialTable {
            current_trial_phase: TrialPhase::Shuffle,
            deck,
            dealer_hand,
            player,
            player_cards_before_trial,
        })
    }

    pub fn current_trial_phase(&self) -> TrialPhase {
        self.current_trial_phase
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer_hand
    }

    pub fn player(&self) -> &PlayerSpot {
        &self.player
    }

    #[allowed_phase(Shuffle)]
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), BlackjackError> {
        self.deck.shuffle(rng);
        self.current_trial_phase = TrialPhase::PlayerPlay;
        Ok(())
    }

    #[allowed_phase(PlayerPlay)]
    pub fn player_plays(&mut self) -> Result<(), BlackjackError> {
        if let PlayerSpot::HitOnce(hand) = &mut self.player {
            hand.add_card(self.deck.deal()?);
        }
        self.current_trial_phase = TrialPhase::DealerPlay;
        Ok(())
    }

    /// The dealer draws until reaching 17 and stands on soft 17.
    #[allowed_phase(DealerPlay)]
    pub fn dealer_plays(&mut self) -> Result<(), BlackjackError> {
        while self.dealer_hand.value() < DEALER_STAND_TOTAL {
            self.dealer_hand.add_card(self.deck.deal()?);
        }
        self.current_trial_phase = TrialPhase::Summary;
        Ok(())
    }

    /// A busted player loses even if the dealer busts too. A dealer natural beats any player total.
    #[allowed_phase(Summary)]
    pub fn summary(&mut self) -> Result<TrialResult, BlackjackError> {
        let player_total = match &self.player {
            PlayerSpot::StandOn(total) => *total,
            PlayerSpot::HitOnce(hand) => hand.value(),
        };
        let dealer_total = self.dealer_hand.value();

        let result = if player_total > 21 || self.dealer_hand.is_natural() {
            TrialResult::Lose
        } else if dealer_total > 21 || dealer_total < player_total {
            TrialResult::Win
        } else if dealer_total > player_total {
            TrialResult::Lose
        } else {
            TrialResult::Push
        };
        self.current_trial_phase = TrialPhase::Restore;
        Ok(result)
    }

    #[allowed_phase(Restore)]
    pub fn restore(&mut self) -> Result<(), BlackjackError> {
        for card in self.dealer_hand.take_cards_after(1) {
            self.deck.add_card(card);
        }
        if let PlayerSpot::HitOnce(hand) = &mut self.player {
            for card in hand.take_cards_after(self.player_cards_before_trial) {
                self.deck.add_card(card);
            }
        }
        self.current_trial_phase = TrialPhase::Shuffle;
        Ok(())
    }

    pub fn play_once<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<TrialResult, BlackjackError> {
        self.shuffle(rng)?;
        self.player_plays()?;
        self.dealer_plays()?;
        let result = self.summary()?;
        self.restore()?;
        Ok(result)
    }
}
