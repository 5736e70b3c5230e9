use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::player::{PlayerAction as A, Seat};

/// An action after validation, carrying the exact chips it moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidatedAction {
    Fold,
    Check,
    /// Chips paid toward the current bet (less than owed only when all-in).
    Call { pay: u32 },
    /// `pay` is call requirement plus `increment`; when capped by the stack
    /// the increment is whatever the stack covered beyond the call.
    Raise { pay: u32, increment: u32 },
}

impl ValidatedAction {
    /// Chips this action moves from the stack to the street.
    pub fn chips(&self) -> u32 {
        match *self {
            ValidatedAction::Fold | ValidatedAction::Check => 0,
            ValidatedAction::Call { pay } | ValidatedAction::Raise { pay, .. } => pay,
        }
    }
}

/// Validates a player action against the seat's stack and the street's bet.
///
/// Converts a [`crate::player::PlayerAction`] into a [`ValidatedAction`],
/// applying the degradations of the betting rules:
///
/// - a call with nothing owed is a check;
/// - a raise whose total the stack cannot cover becomes an all-in, which may
///   be smaller than `min_raise`;
/// - an all-in "raise" that does not get past the call requirement is a call.
///
/// # Errors
///
/// - [`GameError::CannotCheck`] - checking while chips are owed
/// - [`GameError::InvalidRaise`] - a zero increment, or an increment below
///   `min_raise` that the stack could have covered
///
/// # Examples
///
/// ```
/// use riverboat_engine::rules::{validate_action, ValidatedAction};
/// use riverboat_engine::player::{PlayerAction, PlayerId, Seat};
///
/// let seat = Seat::new(PlayerId(1), "ana", 130);
///
/// // owes 100, asks to raise 50 more, only has 130: all-in for 130
/// let va = validate_action(&seat, 100, 20, PlayerAction::Raise(50)).unwrap();
/// assert_eq!(va, ValidatedAction::Raise { pay: 130, increment: 30 });
///
/// // nothing owed: a call is just a check
/// let va = validate_action(&seat, 0, 20, PlayerAction::Call).unwrap();
/// assert_eq!(va, ValidatedAction::Check);
/// ```
pub fn validate_action(
    seat: &Seat,
    current_bet: u32,
    min_raise: u32,
    action: A,
) -> Result<ValidatedAction, GameError> {
    let need = seat.call_need(current_bet);
    let stack = seat.stack();
    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::Check => {
            if need == 0 {
                Ok(ValidatedAction::Check)
            } else {
                Err(GameError::CannotCheck { owed: need })
            }
        }
        A::Call => {
            if need == 0 {
                Ok(ValidatedAction::Check)
            } else {
                Ok(ValidatedAction::Call {
                    pay: need.min(stack),
                })
            }
        }
        A::Raise(amount) => {
            if amount == 0 {
                return Err(GameError::InvalidRaise {
                    amount,
                    minimum: min_raise,
                });
            }
            let wanted = need.saturating_add(amount);
            if wanted >= stack {
                if stack <= need {
                    return Ok(if need == 0 {
                        ValidatedAction::Check
                    } else {
                        ValidatedAction::Call { pay: stack }
                    });
                }
                Ok(ValidatedAction::Raise {
                    pay: stack,
                    increment: stack - need,
                })
            } else if amount < min_raise {
                Err(GameError::InvalidRaise {
                    amount,
                    minimum: min_raise,
                })
            } else {
                Ok(ValidatedAction::Raise {
                    pay: wanted,
                    increment: amount,
                })
            }
        }
    }
}
