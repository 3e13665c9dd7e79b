use crate::content::Challenge;
use crate::session::placement::Placement;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    pub fn message(self) -> &'static str {
        match self {
            Verdict::Correct => "Correct!",
            Verdict::Incorrect => "Not quite right. Try again.",
        }
    }

    pub fn is_correct(self) -> bool {
        self == Verdict::Correct
    }
}

/// Position-wise exact comparison against the canonical order.
///
/// Every slot must be filled and byte-equal to the expected word, so case and
/// diacritics matter ("esta" does not match "está").
pub fn evaluate(placement: &Placement, challenge: &Challenge) -> Verdict {
    if placement.len() != challenge.correct_order.len() {
        return Verdict::Incorrect;
    }
    let all_match = placement
        .slots()
        .iter()
        .zip(&challenge.correct_order)
        .all(|(slot, expected)| slot.as_deref() == Some(expected.as_str()));
    if all_match {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}
