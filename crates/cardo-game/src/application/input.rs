//! Port through which the round engine asks players for their answers.

use cardo_core::error::DomainError;

use crate::domain::roles::Role;
use crate::domain::round::{InputRejection, Offer};

/// Source of player answers.
///
/// Answers are raw text as typed, numbered `1..=3` against the offer. The
/// engine parses them and calls [`RoundInput::rejected`] before asking
/// again, so implementations never validate. The guess prompt receives the
/// same offer as the choose prompt and nothing else.
pub trait RoundInput: Send {
    /// Asks the cardoelector which card they pick.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Input` if no answer can be read at all.
    fn choose(&mut self, cardoelector: &str, offer: &Offer) -> Result<String, DomainError>;

    /// Asks the cardomante which card they think was picked.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Input` if no answer can be read at all.
    fn guess(&mut self, cardomante: &str, offer: &Offer) -> Result<String, DomainError>;

    /// Tells `player` their last answer was unusable.
    fn rejected(&mut self, player: &str, role: Role, rejection: &InputRejection);

    /// Called once `player`'s answer has been accepted, before the other
    /// player is asked.
    fn accepted(&mut self, _player: &str, _role: Role) {}
}
