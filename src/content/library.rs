use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_embed::Embed;
use serde::Deserialize;
use thiserror::Error;

use crate::content::{
    Challenge, GrammarNote, Language, LanguagePack, TemplateToken, VocabularyEntry,
};

#[derive(Embed)]
#[folder = "assets/content/"]
struct ContentAssets;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content table {0} is not bundled")]
    MissingAsset(&'static str),
    #[error("content table {file} is not valid UTF-8")]
    InvalidUtf8 { file: &'static str },
    #[error("failed to parse {file}: {source}")]
    Parse {
        file: &'static str,
        #[source]
        source: toml::de::Error,
    },
    #[error("{file} declares language {found:?}, expected {expected:?}")]
    LanguageMismatch {
        file: &'static str,
        expected: Language,
        found: Language,
    },
    #[error("{language} has no {what}")]
    Empty { language: Language, what: &'static str },
    #[error("challenge {challenge}: template has {template} positions but the answer has {answer}")]
    TemplateLength {
        challenge: String,
        template: usize,
        answer: usize,
    },
    #[error("challenge {challenge}: hint {hint:?} at position {position} does not match answer {answer:?}")]
    HintMismatch {
        challenge: String,
        position: usize,
        hint: String,
        answer: String,
    },
    #[error("challenge {challenge}: answer word {word:?} is missing from the word bank")]
    MissingBankWord { challenge: String, word: String },
    #[error("challenge {challenge}: unknown grammar tip {tip:?}")]
    UnknownGrammarTip { challenge: String, tip: String },
}

#[derive(Deserialize)]
struct RawPack {
    language: Language,
    #[serde(default)]
    vocabulary: Vec<VocabularyEntry>,
    #[serde(default)]
    challenges: Vec<RawChallenge>,
    #[serde(default)]
    grammar_tips: Vec<RawGrammarTip>,
}

#[derive(Deserialize)]
struct RawChallenge {
    id: String,
    template: Vec<String>,
    correct_order: Vec<String>,
    translation: String,
    word_bank: Vec<String>,
    grammar_tip: Option<String>,
}

#[derive(Deserialize)]
struct RawGrammarTip {
    id: String,
    rule: String,
    example: String,
}

/// All language packs, loaded once at startup.
///
/// Word banks are shuffled exactly once, while loading. The shuffle comes from
/// the caller's RNG, so a fixed seed gives a reproducible deck.
#[derive(Clone, Debug)]
pub struct ContentLibrary {
    packs: Vec<LanguagePack>,
}

impl ContentLibrary {
    pub fn load<R: Rng>(rng: &mut R) -> Result<Self, ContentError> {
        let mut packs = Vec::with_capacity(Language::ALL.len());
        for language in Language::ALL {
            let file = language.asset_name();
            let asset = ContentAssets::get(file).ok_or(ContentError::MissingAsset(file))?;
            let text = std::str::from_utf8(asset.data.as_ref())
                .map_err(|_| ContentError::InvalidUtf8 { file })?;
            packs.push(parse_pack(language, file, text, rng)?);
        }
        Ok(Self { packs })
    }

    /// Load with an explicit seed, or from entropy when `seed` is `None`.
    pub fn load_seeded(seed: Option<u64>) -> Result<Self, ContentError> {
        let mut rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self::load(&mut rng)
    }

    pub fn pack(&self, language: Language) -> &LanguagePack {
        // load() pushes one pack per entry of Language::ALL, in order.
        let idx = Language::ALL
            .iter()
            .position(|&l| l == language)
            .unwrap_or_default();
        &self.packs[idx]
    }

    pub fn packs(&self) -> &[LanguagePack] {
        &self.packs
    }
}

pub(crate) fn parse_pack<R: Rng>(
    language: Language,
    file: &'static str,
    text: &str,
    rng: &mut R,
) -> Result<LanguagePack, ContentError> {
    let raw: RawPack = toml::from_str(text).map_err(|source| ContentError::Parse { file, source })?;
    if raw.language != language {
        return Err(ContentError::LanguageMismatch {
            file,
            expected: language,
            found: raw.language,
        });
    }
    if raw.vocabulary.is_empty() {
        return Err(ContentError::Empty { language, what: "vocabulary" });
    }
    if raw.challenges.is_empty() {
        return Err(ContentError::Empty { language, what: "challenges" });
    }

    let grammar_tips: Vec<GrammarNote> = raw
        .grammar_tips
        .into_iter()
        .map(|tip| GrammarNote {
            id: tip.id,
            language,
            rule: tip.rule,
            example: tip.example,
        })
        .collect();

    let mut challenges = Vec::with_capacity(raw.challenges.len());
    for raw_challenge in raw.challenges {
        let challenge = build_challenge(raw_challenge, &grammar_tips)?;
        challenges.push(challenge);
    }
    for challenge in &mut challenges {
        challenge.word_bank.shuffle(rng);
    }

    Ok(LanguagePack {
        language,
        vocabulary: raw.vocabulary,
        challenges,
        grammar_tips,
    })
}

fn build_challenge(raw: RawChallenge, tips: &[GrammarNote]) -> Result<Challenge, ContentError> {
    if raw.template.len() != raw.correct_order.len() {
        return Err(ContentError::TemplateLength {
            challenge: raw.id,
            template: raw.template.len(),
            answer: raw.correct_order.len(),
        });
    }

    let template: Vec<TemplateToken> = raw.template.iter().map(|t| TemplateToken::parse(t)).collect();
    for (position, (token, answer)) in template.iter().zip(&raw.correct_order).enumerate() {
        if let Some(hint) = token.hint()
            && hint != answer
        {
            return Err(ContentError::HintMismatch {
                challenge: raw.id,
                position,
                hint: hint.to_string(),
                answer: answer.clone(),
            });
        }
    }

    if let Some(word) = raw.correct_order.iter().find(|w| !raw.word_bank.contains(w)) {
        return Err(ContentError::MissingBankWord {
            challenge: raw.id,
            word: word.clone(),
        });
    }

    if let Some(tip) = &raw.grammar_tip
        && !tips.iter().any(|t| &t.id == tip)
    {
        return Err(ContentError::UnknownGrammarTip {
            challenge: raw.id,
            tip: tip.clone(),
        });
    }

    Ok(Challenge {
        id: raw.id,
        template,
        correct_order: raw.correct_order,
        translation: raw.translation,
        word_bank: raw.word_bank,
        grammar_tip: raw.grammar_tip,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    const MINIMAL: &str = r#"
language = "es"

[[vocabulary]]
id = "es1"
word = "gato"
translation = "cat"
image = "cat"
category = "animals"

[[challenges]]
id = "es_s1"
template = ["___", "___", "bebe", "___"]
correct_order = ["el", "gato", "bebe", "agua"]
translation = "The cat drinks water"
word_bank = ["el", "la", "gato", "bebe", "agua", "sol"]
grammar_tip = "es_gender"

[[grammar_tips]]
id = "es_gender"
rule = "Gendered Articles"
example = "el gato, la casa"
"#;

    #[test]
    fn test_all_bundled_languages_load() {
        let library = ContentLibrary::load(&mut rng()).unwrap();
        assert_eq!(library.packs().len(), 4);
        for language in Language::ALL {
            let pack = library.pack(language);
            assert_eq!(pack.language, language);
            assert!(!pack.vocabulary.is_empty());
            assert!(!pack.challenges.is_empty());
            for challenge in &pack.challenges {
                assert_eq!(challenge.template.len(), challenge.blank_count());
                let tip = challenge.grammar_tip.as_deref().unwrap();
                assert!(pack.grammar_tip(tip).is_some());
            }
        }
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let a = ContentLibrary::load_seeded(Some(42)).unwrap();
        let b = ContentLibrary::load_seeded(Some(42)).unwrap();
        for language in Language::ALL {
            let banks_a: Vec<_> = a.pack(language).challenges.iter().map(|c| &c.word_bank).collect();
            let banks_b: Vec<_> = b.pack(language).challenges.iter().map(|c| &c.word_bank).collect();
            assert_eq!(banks_a, banks_b);
        }
    }

    #[test]
    fn test_shuffled_bank_is_permutation_of_source() {
        let pack = parse_pack(Language::Spanish, "t.toml", MINIMAL, &mut rng()).unwrap();
        let mut bank = pack.challenges[0].word_bank.clone();
        bank.sort();
        let mut expected: Vec<String> = ["el", "la", "gato", "bebe", "agua", "sol"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        expected.sort();
        assert_eq!(bank, expected);
    }

    #[test]
    fn test_template_positions_parsed() {
        let pack = parse_pack(Language::Spanish, "t.toml", MINIMAL, &mut rng()).unwrap();
        let challenge = &pack.challenges[0];
        assert_eq!(challenge.blank_count(), 4);
        assert_eq!(challenge.template[2], TemplateToken::Fixed("bebe".to_string()));
        assert_eq!(challenge.template[0], TemplateToken::Blank);
        assert_eq!(pack.grammar_tips[0].language, Language::Spanish);
    }

    #[test]
    fn test_language_mismatch_rejected() {
        let err = parse_pack(Language::French, "t.toml", MINIMAL, &mut rng()).unwrap_err();
        assert!(matches!(err, ContentError::LanguageMismatch { .. }));
    }

    #[test]
    fn test_hint_mismatch_rejected() {
        let text = MINIMAL.replace(r#""___", "___", "bebe""#, r#""___", "___", "come""#);
        let err = parse_pack(Language::Spanish, "t.toml", &text, &mut rng()).unwrap_err();
        assert!(matches!(err, ContentError::HintMismatch { position: 2, .. }));
    }

    #[test]
    fn test_missing_bank_word_rejected() {
        let text = MINIMAL.replace(r#"["el", "la", "gato", "bebe", "agua", "sol"]"#, r#"["el", "la", "gato", "bebe", "sol"]"#);
        let err = parse_pack(Language::Spanish, "t.toml", &text, &mut rng()).unwrap_err();
        assert!(err.to_string().contains("agua"));
    }

    #[test]
    fn test_template_length_rejected() {
        let text = MINIMAL.replace(r#"["___", "___", "bebe", "___"]"#, r#"["___", "___", "bebe"]"#);
        let err = parse_pack(Language::Spanish, "t.toml", &text, &mut rng()).unwrap_err();
        assert!(matches!(err, ContentError::TemplateLength { template: 3, answer: 4, .. }));
    }

    #[test]
    fn test_unknown_grammar_tip_rejected() {
        let text = MINIMAL.replace(r#"grammar_tip = "es_gender""#, r#"grammar_tip = "es_verbs""#);
        let err = parse_pack(Language::Spanish, "t.toml", &text, &mut rng()).unwrap_err();
        assert!(matches!(err, ContentError::UnknownGrammarTip { .. }));
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = parse_pack(Language::Spanish, "broken.toml", "language = ", &mut rng()).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }
}
