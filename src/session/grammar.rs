use crate::content::GrammarNote;

/// Grammar notes surfaced by wrong answers, most recent first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GrammarNotes {
    notes: Vec<GrammarNote>,
}

impl GrammarNotes {
    /// Prepend `note` unless a note with the same id is already shown.
    pub fn surface(&mut self, note: &GrammarNote) -> bool {
        if self.contains(&note.id) {
            return false;
        }
        self.notes.insert(0, note.clone());
        true
    }

    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        self.notes.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.notes.iter().any(|n| n.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&GrammarNote> {
        self.notes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GrammarNote> {
        self.notes.iter()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
