//! Text cleaning applied before sentiment scoring.
//!
//! Mirrors the usual NLTK preprocessing chain: HTML removal, letters-only
//! filtering, lowercasing, whitespace tokenization, English stopword removal
//! and noun lemmatization.

use regex::Regex;
use scraper::Html;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static NON_ALPHA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z\s]").expect("static regex"));

/// NLTK English stopword list.
const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

static STOPWORD_SET: LazyLock<HashSet<&'static str>> = LazyLock::new(|| STOPWORDS.iter().copied().collect());

/// Irregular plurals resolved before the suffix rules.
static IRREGULAR: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("men", "man"),
        ("women", "woman"),
        ("children", "child"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("mice", "mouse"),
        ("geese", "goose"),
        ("data", "datum"),
        ("media", "medium"),
        ("criteria", "criterion"),
        ("analyses", "analysis"),
        ("crises", "crisis"),
        ("theses", "thesis"),
        ("leaves", "leaf"),
        ("lives", "life"),
        ("wives", "wife"),
        ("knives", "knife"),
        ("halves", "half"),
        ("shelves", "shelf"),
        ("chairmen", "chairman"),
        ("businessmen", "businessman"),
    ]
    .into_iter()
    .collect()
});

/// Words ending in `s` that are not plurals.
static INVARIANT: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "news", "series", "species", "physics", "economics", "politics", "analytics",
        "electronics", "headquarters", "means", "always", "perhaps", "across", "towards",
        "afterwards", "besides", "sometimes", "whereas", "various", "previous", "plus", "bonus",
        "status", "census", "campus", "virus", "focus", "thus", "yes", "gas", "chaos", "lens",
        "billions", "millions",
    ]
    .into_iter()
    .collect()
});

/// Nouns ending in `-ie`, whose plurals would otherwise read as `-y` plurals.
static IE_NOUNS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "movie", "cookie", "rookie", "zombie", "calorie", "pie", "tie", "lie", "hippie", "goalie",
        "selfie", "brownie", "prairie", "genie", "auntie", "smoothie", "freebie", "newbie",
        "techie", "foodie", "sortie", "birdie", "eyrie", "talkie", "walkie", "indie", "boogie",
    ]
    .into_iter()
    .collect()
});

/// Nouns ending in `-che`.
static CHE_NOUNS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "niche", "cache", "avalanche", "cliche", "psyche", "quiche", "creche", "moustache",
        "mustache", "panache", "microniche",
    ]
    .into_iter()
    .collect()
});

/// Text content of an HTML fragment, entities decoded and tags dropped.
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment.root_element().text().collect::<String>()
}

fn ends_in_vowel(stem: &str) -> bool {
    stem.ends_with(['a', 'e', 'i', 'o', 'u'])
}

/// Singular for an `-es` plural, or `None` when the word is a plain `-s`
/// plural. An `-e` singular wins wherever the bare stem is not a word shape
/// English nouns take (`prizes`, `headaches`).
fn singular_of_es(word: &str) -> Option<String> {
    let stem = word.strip_suffix("es")?;

    if stem.ends_with("ss") || stem.ends_with("sh") || stem.ends_with('x') {
        return Some(stem.to_string());
    }
    if stem.ends_with("ch") {
        let e_form = format!("{}e", stem);
        let ache = stem
            .strip_suffix("ach")
            .is_some_and(|head| head.is_empty() || !ends_in_vowel(head));
        return Some(if ache || CHE_NOUNS.contains(e_form.as_str()) { e_form } else { stem.to_string() });
    }
    if stem.ends_with('z') {
        if stem.ends_with("zz") || stem.ends_with("tz") {
            return Some(stem.to_string());
        }
        return Some(format!("{}e", stem));
    }
    None
}

/// Reduce a lowercase token to its noun lemma.
pub fn lemmatize(word: &str) -> String {
    if let Some(lemma) = IRREGULAR.get(word) {
        return lemma.to_string();
    }
    if INVARIANT.contains(word) || word.len() <= 3 {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies") {
        let ie_form = format!("{}ie", stem);
        if IE_NOUNS.contains(ie_form.as_str()) {
            return ie_form;
        }
        if stem.len() > 1 {
            return format!("{}y", stem);
        }
    }
    if let Some(singular) = singular_of_es(word) {
        return singular;
    }
    if word.ends_with('s') && !["ss", "us", "is"].iter().any(|s| word.ends_with(s)) {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// Normalize free text into space-separated lemmas. Missing or blank input
/// yields an empty string.
pub fn clean_and_preprocess(text: Option<&str>) -> String {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return String::new();
    };

    let plain = strip_html(text);
    let letters = NON_ALPHA.replace_all(&plain, "").to_lowercase();

    letters
        .split_whitespace()
        .filter(|token| !STOPWORD_SET.contains(token))
        .map(lemmatize)
        .collect::<Vec<_>>()
        .join(" ")
}
