//! Ordered conversation history for one session.
//!
//! A [`Transcript`] always starts with the fixed two-turn preamble and can
//! only grow at the end or be reset back to that preamble.

use crate::core::constants::{PREAMBLE_ASSISTANT, PREAMBLE_USER};
use crate::core::message::{Speaker, Turn};

pub const PREAMBLE_LEN: usize = 2;

pub fn preamble() -> [Turn; PREAMBLE_LEN] {
    [Turn::user(PREAMBLE_USER), Turn::assistant(PREAMBLE_ASSISTANT)]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn seeded() -> Self {
        Self {
            turns: preamble().into(),
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Never true for a well-formed transcript; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn is_seeded_only(&self) -> bool {
        self.turns.len() == PREAMBLE_LEN
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Removes the trailing user turn if it has no answer yet. The preamble is
    /// never touched.
    pub(crate) fn pop_unanswered_user(&mut self) -> Option<Turn> {
        if self.turns.len() <= PREAMBLE_LEN {
            return None;
        }
        match self.turns.last() {
            Some(turn) if turn.speaker() == Speaker::User => self.turns.pop(),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::seeded();
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_transcript_holds_only_preamble() {
        let transcript = Transcript::seeded();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.turns()[0].speaker(), Speaker::User);
        assert_eq!(transcript.turns()[1].speaker(), Speaker::Assistant);
        assert_eq!(transcript.turns()[0].text(), PREAMBLE_USER);
        assert!(transcript.is_seeded_only());
    }

    #[test]
    fn reset_discards_history() {
        let mut transcript = Transcript::seeded();
        for i in 0..5 {
            transcript.push(Turn::user(format!("q{i}")));
            transcript.push(Turn::assistant(format!("a{i}")));
        }
        assert_eq!(transcript.len(), 12);

        transcript.reset();
        assert_eq!(transcript, Transcript::seeded());
    }

    #[test]
    fn pop_unanswered_user_leaves_preamble_and_answers_alone() {
        let mut transcript = Transcript::seeded();
        assert!(transcript.pop_unanswered_user().is_none());

        transcript.push(Turn::user("q"));
        transcript.push(Turn::assistant("a"));
        assert!(transcript.pop_unanswered_user().is_none());
        assert_eq!(transcript.len(), 4);

        transcript.push(Turn::user("unanswered"));
        let popped = transcript.pop_unanswered_user().expect("user turn");
        assert_eq!(popped.text(), "unanswered");
        assert_eq!(transcript.len(), 4);
    }
}
