pub mod checker;
pub mod grammar;
pub mod placement;
pub mod progress;

use log::debug;

use crate::content::{Challenge, Language, LanguagePack};
use checker::Verdict;
use grammar::GrammarNotes;
use placement::{DragPayload, Placement};
use progress::SessionProgress;

/// The active sentence challenge and the learner's attempt at it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChallengeState {
    pub index: usize,
    pub placement: Placement,
    pub verdict: Option<Verdict>,
    pub complete: bool,
}

impl ChallengeState {
    pub fn start(index: usize, challenge: &Challenge) -> Self {
        Self {
            index,
            placement: Placement::empty(challenge.blank_count()),
            verdict: None,
            complete: false,
        }
    }

    pub fn can_drag(&self) -> bool {
        !self.complete
    }

    pub fn can_check(&self) -> bool {
        !self.complete && self.placement.is_filled()
    }
}

/// Everything scoped to the selected language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub language: Language,
    pub challenge: ChallengeState,
    pub progress: SessionProgress,
    pub notes: GrammarNotes,
}

impl Session {
    /// Fresh session on the first challenge of `pack`.
    pub fn new(pack: &LanguagePack) -> Self {
        let challenge = pack
            .challenges
            .first()
            .map(|c| ChallengeState::start(0, c))
            .unwrap_or(ChallengeState {
                index: 0,
                placement: Placement::default(),
                verdict: None,
                complete: false,
            });
        Self {
            language: pack.language,
            challenge,
            progress: SessionProgress::default(),
            notes: GrammarNotes::default(),
        }
    }

    pub fn active_challenge<'a>(&self, pack: &'a LanguagePack) -> Option<&'a Challenge> {
        pack.challenge(self.challenge.index)
    }

    /// Drop a dragged word onto `target`. Ignored once the challenge is
    /// complete. A successful drop clears the previous verdict.
    pub fn drop_word(&mut self, payload: &DragPayload, target: usize) -> bool {
        if !self.challenge.can_drag() {
            return false;
        }
        let changed = self.challenge.placement.drop_payload(payload, target);
        if changed {
            self.challenge.verdict = None;
        }
        changed
    }

    /// Check the placement. Always counts as an attempt.
    pub fn check(&mut self, pack: &LanguagePack) -> Verdict {
        let Some(challenge) = self.active_challenge(pack) else {
            return Verdict::Incorrect;
        };
        let verdict = checker::evaluate(&self.challenge.placement, challenge);
        match verdict {
            Verdict::Correct => {
                self.progress
                    .record_success(&challenge.id, self.challenge.placement.words());
                self.challenge.complete = true;
            }
            Verdict::Incorrect => {
                self.progress.record_failure();
                self.challenge.complete = false;
                if let Some(note) = challenge
                    .grammar_tip
                    .as_deref()
                    .and_then(|id| pack.grammar_tip(id))
                    && self.notes.surface(note)
                {
                    debug!("surfaced grammar note {}", note.id);
                }
            }
        }
        debug!(
            "checked {}: {:?}, accuracy {}%",
            challenge.id,
            verdict,
            self.progress.accuracy()
        );
        self.challenge.verdict = Some(verdict);
        verdict
    }

    /// Clear the placement and verdict. Counters are untouched.
    pub fn reset_placement(&mut self) {
        self.challenge.placement.clear();
        self.challenge.verdict = None;
        self.challenge.complete = false;
    }

    /// Advance to the next challenge, wrapping after the last one.
    pub fn next_challenge(&mut self, pack: &LanguagePack) {
        if pack.challenges.is_empty() {
            return;
        }
        let next = (self.challenge.index + 1) % pack.challenges.len();
        self.challenge = ChallengeState::start(next, &pack.challenges[next]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLibrary;
    use placement::DragOrigin;

    fn spanish() -> LanguagePack {
        ContentLibrary::load_seeded(Some(1))
            .unwrap()
            .pack(Language::Spanish)
            .clone()
    }

    fn place(session: &mut Session, words: &[&str]) {
        for (i, w) in words.iter().enumerate() {
            session.drop_word(&DragPayload::from_bank(w), i);
        }
    }

    #[test]
    fn test_new_session_starts_on_first_challenge() {
        let pack = spanish();
        let session = Session::new(&pack);
        assert_eq!(session.challenge.index, 0);
        assert_eq!(session.challenge.placement.len(), 4);
        assert_eq!(session.progress.accuracy(), 100);
    }

    #[test]
    fn test_correct_check_updates_progress() {
        let pack = spanish();
        let mut session = Session::new(&pack);
        place(&mut session, &["el", "gato", "bebe", "agua"]);
        assert!(session.challenge.can_check());

        assert_eq!(session.check(&pack), Verdict::Correct);
        assert!(session.challenge.complete);
        assert!(session.progress.completed_challenges.contains("es_s1"));
        for w in ["el", "gato", "bebe", "agua"] {
            assert!(session.progress.learned_words.contains(w));
        }
        assert_eq!(session.progress.attempts, 1);
        assert_eq!(session.progress.correct_attempts, 1);
        assert!(session.notes.is_empty());
    }

    #[test]
    fn test_wrong_check_surfaces_note_once() {
        let pack = spanish();
        let mut session = Session::new(&pack);
        place(&mut session, &["la", "gato", "bebe", "agua"]);

        assert_eq!(session.check(&pack), Verdict::Incorrect);
        assert_eq!(session.progress.attempts, 1);
        assert_eq!(session.progress.correct_attempts, 0);
        assert!(session.progress.learned_words.is_empty());
        assert!(session.notes.contains("es_gender"));

        session.check(&pack);
        assert_eq!(session.notes.len(), 1);
        assert_eq!(session.progress.attempts, 2);
        assert_eq!(session.progress.accuracy(), 0);
    }

    #[test]
    fn test_drop_clears_verdict_and_is_blocked_when_complete() {
        let pack = spanish();
        let mut session = Session::new(&pack);
        place(&mut session, &["la", "gato", "bebe", "agua"]);
        session.check(&pack);
        assert_eq!(session.challenge.verdict, Some(Verdict::Incorrect));

        session.drop_word(&DragPayload::from_bank("el"), 0);
        assert_eq!(session.challenge.verdict, None);

        session.check(&pack);
        assert!(session.challenge.complete);
        let before = session.challenge.placement.clone();
        let payload = DragPayload {
            word: "gato".to_string(),
            origin: DragOrigin::Slot(1),
        };
        assert!(!session.drop_word(&payload, 0));
        assert_eq!(session.challenge.placement, before);
    }

    #[test]
    fn test_reset_keeps_counters() {
        let pack = spanish();
        let mut session = Session::new(&pack);
        place(&mut session, &["la", "gato", "bebe", "agua"]);
        session.check(&pack);
        session.reset_placement();
        session.reset_placement();
        assert_eq!(session.challenge.placement, Placement::empty(4));
        assert_eq!(session.challenge.verdict, None);
        assert_eq!(session.progress.attempts, 1);
    }

    #[test]
    fn test_next_challenge_wraps() {
        let pack = spanish();
        let mut session = Session::new(&pack);
        let count = pack.challenges.len();
        for _ in 0..count {
            session.next_challenge(&pack);
        }
        assert_eq!(session.challenge.index, 0);
        session.next_challenge(&pack);
        assert_eq!(session.challenge.index, 1);
        assert_eq!(
            session.challenge.placement.len(),
            pack.challenges[1].blank_count()
        );
        assert!(!session.challenge.complete);
    }
}
