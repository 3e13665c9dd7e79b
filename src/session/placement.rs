/// Where a dragged word was picked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragOrigin {
    WordBank,
    Slot(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragPayload {
    pub word: String,
    pub origin: DragOrigin,
}

impl DragPayload {
    pub fn from_bank(word: &str) -> Self {
        Self {
            word: word.to_string(),
            origin: DragOrigin::WordBank,
        }
    }

    pub fn from_slot(word: &str, slot: usize) -> Self {
        Self {
            word: word.to_string(),
            origin: DragOrigin::Slot(slot),
        }
    }
}

/// The learner's current attempt: one optional word per slot.
///
/// The length is fixed when the placement is created and never changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Placement {
    slots: Vec<Option<String>>,
}

impl Placement {
    pub fn empty(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Option<String>] {
        &self.slots
    }

    pub fn get(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot).and_then(|s| s.as_deref())
    }

    /// True when every slot holds a word.
    pub fn is_filled(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().filter_map(|s| s.as_deref())
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    /// Apply a drop onto `target`. Returns false when nothing changed
    /// because the target or origin slot is out of range.
    ///
    /// A word from the bank overwrites the target; the previous occupant is
    /// discarded. A word from another slot swaps with the target.
    pub fn drop_payload(&mut self, payload: &DragPayload, target: usize) -> bool {
        if target >= self.slots.len() {
            return false;
        }
        match payload.origin {
            DragOrigin::WordBank => {
                self.slots[target] = Some(payload.word.clone());
            }
            DragOrigin::Slot(source) => {
                if source >= self.slots.len() {
                    return false;
                }
                let displaced = self.slots[target].take();
                self.slots[target] = Some(payload.word.clone());
                if source != target {
                    self.slots[source] = displaced;
                }
            }
        }
        true
    }

    #[cfg(test)]
    pub(crate) fn from_words(words: &[&str]) -> Self {
        Self {
            slots: words
                .iter()
                .map(|w| if w.is_empty() { None } else { Some(w.to_string()) })
                .collect(),
        }
    }
}
