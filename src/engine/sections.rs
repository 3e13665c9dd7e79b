#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    Flashcards,
    Sentences,
    Progress,
    Grammar,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Flashcards,
        Section::Sentences,
        Section::Progress,
        Section::Grammar,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Flashcards => "Vocabulary Cards",
            Section::Sentences => "Sentence Builder",
            Section::Progress => "Lesson Progress",
            Section::Grammar => "Grammar Tips",
        }
    }

    /// Key that toggles the section from anywhere on the dashboard.
    pub fn toggle_key(self) -> char {
        match self {
            Section::Flashcards => 'F',
            Section::Sentences => 'S',
            Section::Progress => 'P',
            Section::Grammar => 'G',
        }
    }
}

/// Collapsed flag per dashboard section. Everything starts expanded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollapsedSections {
    pub flashcards: bool,
    pub sentences: bool,
    pub progress: bool,
    pub grammar: bool,
}

impl CollapsedSections {
    fn flag_mut(&mut self, section: Section) -> &mut bool {
        match section {
            Section::Flashcards => &mut self.flashcards,
            Section::Sentences => &mut self.sentences,
            Section::Progress => &mut self.progress,
            Section::Grammar => &mut self.grammar,
        }
    }

    pub fn is_collapsed(&self, section: Section) -> bool {
        match section {
            Section::Flashcards => self.flashcards,
            Section::Sentences => self.sentences,
            Section::Progress => self.progress,
            Section::Grammar => self.grammar,
        }
    }

    pub fn toggle(&mut self, section: Section) {
        let flag = self.flag_mut(section);
        *flag = !*flag;
    }

    /// Open `section`. Returns true if it was collapsed.
    pub fn expand(&mut self, section: Section) -> bool {
        std::mem::replace(self.flag_mut(section), false)
    }

    pub fn expand_all(&mut self) {
        *self = Self::default();
    }
}
