use std::collections::HashSet;

/// Learning progress for the active language. Reset on language switch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionProgress {
    pub learned_words: HashSet<String>,
    pub completed_challenges: HashSet<String>,
    pub attempts: u32,
    pub correct_attempts: u32,
}

impl SessionProgress {
    /// Percentage of correct checks, 100 before the first attempt.
    pub fn accuracy(&self) -> u32 {
        if self.attempts == 0 {
            return 100;
        }
        let ratio = self.correct_attempts as f64 / self.attempts as f64;
        (ratio * 100.0).round().clamp(0.0, 100.0) as u32
    }

    pub fn record_failure(&mut self) {
        self.attempts += 1;
    }

    pub fn record_success<'a>(
        &mut self,
        challenge_id: &str,
        words: impl IntoIterator<Item = &'a str>,
    ) {
        self.attempts += 1;
        self.correct_attempts += 1;
        self.completed_challenges.insert(challenge_id.to_string());
        self.learned_words
            .extend(words.into_iter().map(str::to_string));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_defaults_to_100() {
        assert_eq!(SessionProgress::default().accuracy(), 100);
    }

    #[test]
    fn test_accuracy_is_rounded_ratio() {
        let mut progress = SessionProgress::default();
        progress.record_failure();
        progress.record_success("a", ["el"]);
        progress.record_failure();
        // 1 / 3 = 33.3
        assert_eq!(progress.accuracy(), 33);
        progress.record_success("b", ["la"]);
        // 2 / 4
        assert_eq!(progress.accuracy(), 50);
        progress.record_success("b", ["la"]);
        // 3 / 5
        assert_eq!(progress.accuracy(), 60);
    }

    #[test]
    fn test_accuracy_rounds_half_up() {
        let mut progress = SessionProgress::default();
        for _ in 0..7 {
            progress.record_success("a", Vec::<&str>::new());
        }
        progress.record_failure();
        // 7 / 8 = 87.5
        assert_eq!(progress.accuracy(), 88);
    }

    #[test]
    fn test_accuracy_stays_in_range() {
        let mut progress = SessionProgress::default();
        for i in 0..50 {
            if i % 3 == 0 {
                progress.record_success("x", Vec::<&str>::new());
            } else {
                progress.record_failure();
            }
            assert!(progress.accuracy() <= 100);
        }
        progress = SessionProgress::default();
        for _ in 0..5 {
            progress.record_failure();
        }
        assert_eq!(progress.accuracy(), 0);
    }

    #[test]
    fn test_success_collects_distinct_words() {
        let mut progress = SessionProgress::default();
        progress.record_success("es_s1", ["el", "gato", "bebe", "agua"]);
        progress.record_success("es_s2", ["el", "perro"]);
        assert_eq!(progress.learned_words.len(), 5);
        assert_eq!(progress.completed_challenges.len(), 2);
    }
}
