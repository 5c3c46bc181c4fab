//! Adaptive language scoring model.
//!
//! Pipeline: character scan -> vocabulary lookups -> performer lookup ->
//! pattern lookups -> length bonus, summed into one additive score that is
//! bucketed by the (mutable) thresholds. Corrections feed every lookup table
//! and nudge the weights and thresholds; the model only ever becomes more
//! opinionated, never forgets.

pub mod store;

use crate::models::SongRef;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

pub use store::LearningStore;

/// Characters specific to Turkish orthography.
const TURKISH_CHARS: &[char] = &[
    'ç', 'ğ', 'ı', 'ö', 'ş', 'ü', 'Ç', 'Ğ', 'İ', 'Ö', 'Ş', 'Ü',
];

/// Static seed vocabulary consulted alongside the learned word sets.
static BASE_TURKISH_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "aşk", "güzel", "kalp", "hayat", "dünya", "sevgi", "mutlu", "hüzün", "göz", "yüz", "el",
        "ay", "güneş", "yıldız", "deniz", "dağ", "orman", "çiçek", "kuş", "bebek", "anne", "baba",
        "kardeş", "arkadaş", "okul", "ev", "yol", "araba", "kitap", "müzik", "şarkı", "dans",
        "oyun",
    ]
    .into_iter()
    .collect()
});

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").unwrap());

/// The two buckets every track is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageLabel {
    Turkish,
    Foreign,
}

impl LanguageLabel {
    /// Language tag used on the wire (`"tr"` / `"en"`).
    pub fn tag(self) -> &'static str {
        match self {
            Self::Turkish => "tr",
            Self::Foreign => "en",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Turkish => "Turkish",
            Self::Foreign => "Foreign",
        }
    }
}

/// Confidence tier derived from the score relative to the thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Additive scoring weights. Wrong classifications push these up over time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Weights {
    pub character: i64,
    pub word: i64,
    pub performer: i64,
    pub length: i64,
    pub pattern: i64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            character: 10,
            word: 50,
            performer: 50,
            length: 10,
            pattern: 30,
        }
    }
}

/// Score cutoffs for confidence tiers and the Turkish/Foreign decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Thresholds {
    pub high: i64,
    pub medium: i64,
    pub low: i64,
    pub turkish: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: 100,
            medium: 60,
            low: 30,
            turkish: 50,
        }
    }
}

/// A pair of learned sets, one per label.
///
/// Serialized as arrays with no guaranteed element ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabeledSets {
    pub turkish: HashSet<String>,
    pub foreign: HashSet<String>,
}

impl LabeledSets {
    fn insert(&mut self, label: LanguageLabel, value: String) {
        match label {
            LanguageLabel::Turkish => self.turkish.insert(value),
            LanguageLabel::Foreign => self.foreign.insert(value),
        };
    }

    fn contains(&self, label: LanguageLabel, value: &str) -> bool {
        match label {
            LanguageLabel::Turkish => self.turkish.contains(value),
            LanguageLabel::Foreign => self.foreign.contains(value),
        }
    }

    /// Total entries across both labels.
    pub fn len(&self) -> usize {
        self.turkish.len() + self.foreign.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turkish.is_empty() && self.foreign.is_empty()
    }
}

/// One user-supplied true label for a track. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correction {
    pub track: SongRef,
    pub correct_label: LanguageLabel,
    pub prior_label: LanguageLabel,
    pub patterns: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl Correction {
    /// Build a correction for a track, deriving its pattern tokens.
    pub fn new(track: SongRef, correct_label: LanguageLabel, prior_label: LanguageLabel) -> Self {
        let patterns = extract_patterns(&track.title, &track.artist);
        Self {
            track,
            correct_label,
            prior_label,
            patterns,
            timestamp: Utc::now(),
        }
    }
}

/// The persisted scoring model. One per process, loaded at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LearningState {
    pub corrections: Vec<Correction>,
    pub learned_words: LabeledSets,
    pub learned_performers: LabeledSets,
    pub learned_patterns: LabeledSets,
    pub weights: Weights,
    pub thresholds: Thresholds,
    pub last_updated: DateTime<Utc>,
}

impl Default for LearningState {
    fn default() -> Self {
        Self {
            corrections: Vec::new(),
            learned_words: LabeledSets::default(),
            learned_performers: LabeledSets::default(),
            learned_patterns: LabeledSets::default(),
            weights: Weights::default(),
            thresholds: Thresholds::default(),
            last_updated: Utc::now(),
        }
    }
}

/// Aggregate counters surfaced alongside detection results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStats {
    pub total_corrections: usize,
    pub learned_words: usize,
    pub learned_performers: usize,
}

impl LearningState {
    pub fn stats(&self) -> LearningStats {
        LearningStats {
            total_corrections: self.corrections.len(),
            learned_words: self.learned_words.len(),
            learned_performers: self.learned_performers.len(),
        }
    }
}

/// Outcome of scoring one track.
#[derive(Debug, Clone)]
pub struct Detection {
    pub label: LanguageLabel,
    pub confidence: Confidence,
    pub score: i64,
    /// Every contribution that fired, as `name:value` tokens.
    pub patterns_used: Vec<String>,
}

/// Lowercased word tokens of `text`.
fn extract_words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn turkish_char_count(text: &str) -> usize {
    text.chars().filter(|c| TURKISH_CHARS.contains(c)).count()
}

/// Descriptive pattern tokens for a track, shared by detect and learn.
pub fn extract_patterns(title: &str, performer: &str) -> Vec<String> {
    let text = format!("{title} {performer}").to_lowercase();
    let words: Vec<&str> = text.split_whitespace().collect();
    let total_chars = text.chars().count();
    let avg_word_length = (words.iter().map(|w| w.chars().count()).sum::<usize>() as f64
        / words.len().max(1) as f64)
        .round() as usize;
    let ratio = turkish_char_count(&text) as f64 / total_chars.max(1) as f64;

    vec![
        format!("word_count:{}", words.len()),
        format!("avg_word_length:{avg_word_length}"),
        format!("total_length:{total_chars}"),
        format!("turkish_char_ratio:{ratio:.2}"),
    ]
}

/// Score one track against the current model.
pub fn detect(state: &LearningState, title: &str, performer: &str) -> Detection {
    let mut score: i64 = 0;
    let mut used = Vec::new();

    let combined = format!("{title} {performer}");
    let turkish_chars = turkish_char_count(&combined) as i64;
    score += turkish_chars * state.weights.character;
    if turkish_chars > 0 {
        used.push(format!("turkish_chars:{turkish_chars}"));
    }

    for word in extract_words(&combined) {
        if state.learned_words.contains(LanguageLabel::Turkish, &word) {
            score += state.weights.word;
            used.push(format!("learned_turkish_word:{word}"));
        } else if state.learned_words.contains(LanguageLabel::Foreign, &word) {
            score -= state.weights.word;
            used.push(format!("learned_foreign_word:{word}"));
        }

        if BASE_TURKISH_WORDS.contains(word.as_str()) {
            score += state.weights.word;
            used.push(format!("base_turkish_word:{word}"));
        }
    }

    if !performer.is_empty() {
        let key = performer.to_lowercase();
        if state.learned_performers.contains(LanguageLabel::Turkish, &key) {
            score += state.weights.performer;
            used.push(format!("learned_turkish_performer:{performer}"));
        } else if state.learned_performers.contains(LanguageLabel::Foreign, &key) {
            score -= state.weights.performer;
            used.push(format!("learned_foreign_performer:{performer}"));
        }
    }

    for pattern in extract_patterns(title, performer) {
        if state.learned_patterns.contains(LanguageLabel::Turkish, &pattern) {
            score += state.weights.pattern;
            used.push(format!("learned_turkish_pattern:{pattern}"));
        } else if state.learned_patterns.contains(LanguageLabel::Foreign, &pattern) {
            score -= state.weights.pattern;
            used.push(format!("learned_foreign_pattern:{pattern}"));
        }
    }

    let title_len = title.chars().count();
    if title_len > 10 && score > 20 {
        score += state.weights.length;
        used.push(format!("length_bonus:{title_len}"));
    }

    let confidence = if score >= state.thresholds.high {
        Confidence::High
    } else if score >= state.thresholds.medium {
        Confidence::Medium
    } else {
        Confidence::Low
    };
    let label = if score >= state.thresholds.turkish {
        LanguageLabel::Turkish
    } else {
        LanguageLabel::Foreign
    };

    Detection {
        label,
        confidence,
        score,
        patterns_used: used,
    }
}

/// Window of recent corrections the threshold adjustment looks at.
const ACCURACY_WINDOW: usize = 10;

/// Fold one correction into the model.
///
/// Vocabulary always grows; weights only move when the prior classification
/// was wrong; thresholds shift with the recent-accuracy window (tightened
/// below 70%, relaxed above 90%, floored at 30/80).
pub fn learn(state: &mut LearningState, correction: Correction) {
    let label = correction.correct_label;

    let combined = format!("{} {}", correction.track.title, correction.track.artist);
    for word in extract_words(&combined) {
        state.learned_words.insert(label, word);
    }

    if !correction.track.artist.is_empty() {
        state
            .learned_performers
            .insert(label, correction.track.artist.to_lowercase());
    }

    for pattern in &correction.patterns {
        state.learned_patterns.insert(label, pattern.clone());
    }

    let was_correct = correction.correct_label == correction.prior_label;
    state.corrections.push(correction);

    if !was_correct {
        state.weights.word += 2;
        state.weights.performer += 2;
        state.weights.pattern += 1;
    }

    let start = state.corrections.len().saturating_sub(ACCURACY_WINDOW);
    let recent = &state.corrections[start..];
    let accurate = recent
        .iter()
        .filter(|c| c.correct_label == c.prior_label)
        .count();
    let accuracy = accurate as f64 / recent.len() as f64;

    if accuracy < 0.7 {
        state.thresholds.turkish += 5;
        state.thresholds.high += 10;
    } else if accuracy > 0.9 {
        state.thresholds.turkish = (state.thresholds.turkish - 2).max(30);
        state.thresholds.high = (state.thresholds.high - 5).max(80);
    }

    state.last_updated = Utc::now();
}
