use crate::Card;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BlackjackError {
    #[error("cannot deal a card from an empty deck")]
    DeckUnderflow,
    #[error("card {0} is not in the deck")]
    CardNotInDeck(Card),
    #[error("bust chance is undefined for an empty deck")]
    EmptyDeck,
    #[error("number of trials must be positive")]
    ZeroTrials,
    #[error("number of decks must be positive")]
    ZeroDecks,
    #[error("invalid dealer up card {0}, it must be in [2, 11]")]
    InvalidUpCard(u8),
    #[error("invalid player total {0}")]
    InvalidPlayerTotal(u8),
    #[error("{operation} is only allowed in {phase} phase")]
    WrongPhase {
        operation: &'static str,
        phase: &'static str,
    },
    #[error("a simulation worker panicked")]
    WorkerPanicked,
}
