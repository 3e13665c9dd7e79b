pub mod library;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use library::{ContentError, ContentLibrary};

/// Marker used in challenge templates for a position the learner fills in.
pub const BLANK: &str = "___";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "pt")]
    Portuguese,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Spanish,
        Language::French,
        Language::Italian,
        Language::Portuguese,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::Spanish => "es",
            Language::French => "fr",
            Language::Italian => "it",
            Language::Portuguese => "pt",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::Italian => "Italian",
            Language::Portuguese => "Portuguese",
        }
    }

    /// Shown on the language-switch wave.
    pub fn greeting(self) -> &'static str {
        match self {
            Language::Spanish => "¡Hola!",
            Language::French => "Bonjour !",
            Language::Italian => "Ciao!",
            Language::Portuguese => "Olá!",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.code() == code || lang.name().eq_ignore_ascii_case(&code))
    }

    fn asset_name(self) -> &'static str {
        match self {
            Language::Spanish => "spanish.toml",
            Language::French => "french.toml",
            Language::Italian => "italian.toml",
            Language::Portuguese => "portuguese.toml",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageTag {
    Cat,
    Dog,
    House,
    Eat,
    Drink,
    Sun,
    Water,
    ArticleM,
    ArticleF,
    Article,
    In,
    From,
    Is,
    Book,
    Tree,
    Flower,
}

impl ImageTag {
    /// Short glyph shown on the card face in place of artwork.
    pub fn glyph(self) -> &'static str {
        match self {
            ImageTag::Cat => "=^.^=",
            ImageTag::Dog => "U・ᴥ・U",
            ImageTag::House => "/\\[ ]",
            ImageTag::Eat => "-(o)-",
            ImageTag::Drink => "[_]>",
            ImageTag::Sun => "\\ O /",
            ImageTag::Water => "~ ~ ~",
            ImageTag::ArticleM => "[ M ]",
            ImageTag::ArticleF => "[ F ]",
            ImageTag::Article => "[ ≡ ]",
            ImageTag::In => "( • )",
            ImageTag::From => "o -> o",
            ImageTag::Is => "( = )",
            ImageTag::Book => "|≡≡|",
            ImageTag::Tree => "\\|/ |",
            ImageTag::Flower => "@ |",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Animals,
    Objects,
    Verbs,
    Articles,
    Nature,
    Prepositions,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Animals => "animals",
            Category::Objects => "objects",
            Category::Verbs => "verbs",
            Category::Articles => "articles",
            Category::Nature => "nature",
            Category::Prepositions => "prepositions",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub id: String,
    pub word: String,
    pub translation: String,
    pub image: ImageTag,
    pub category: Category,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateToken {
    Fixed(String),
    Blank,
}

impl TemplateToken {
    fn parse(raw: &str) -> Self {
        if raw == BLANK {
            TemplateToken::Blank
        } else {
            TemplateToken::Fixed(raw.to_string())
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            TemplateToken::Fixed(word) => Some(word),
            TemplateToken::Blank => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge {
    pub id: String,
    pub template: Vec<TemplateToken>,
    pub correct_order: Vec<String>,
    pub translation: String,
    pub word_bank: Vec<String>,
    pub grammar_tip: Option<String>,
}

impl Challenge {
    /// Number of slots in a placement for this challenge.
    pub fn blank_count(&self) -> usize {
        self.correct_order.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrammarNote {
    pub id: String,
    pub language: Language,
    pub rule: String,
    pub example: String,
}

/// Everything shipped for one language.
#[derive(Clone, Debug)]
pub struct LanguagePack {
    pub language: Language,
    pub vocabulary: Vec<VocabularyEntry>,
    pub challenges: Vec<Challenge>,
    pub grammar_tips: Vec<GrammarNote>,
}

impl LanguagePack {
    pub fn grammar_tip(&self, id: &str) -> Option<&GrammarNote> {
        self.grammar_tips.iter().find(|tip| tip.id == id)
    }

    pub fn challenge(&self, index: usize) -> Option<&Challenge> {
        self.challenges.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_code_accepts_codes_and_names() {
        assert_eq!(Language::from_code("es"), Some(Language::Spanish));
        assert_eq!(Language::from_code("FR"), Some(Language::French));
        assert_eq!(Language::from_code("italian"), Some(Language::Italian));
        assert_eq!(Language::from_code(" pt "), Some(Language::Portuguese));
        assert_eq!(Language::from_code("de"), None);
    }

    #[test]
    fn test_template_token_parse() {
        assert_eq!(TemplateToken::parse("___"), TemplateToken::Blank);
        assert_eq!(
            TemplateToken::parse("bebe"),
            TemplateToken::Fixed("bebe".to_string())
        );
        assert_eq!(TemplateToken::Blank.hint(), None);
    }
}
