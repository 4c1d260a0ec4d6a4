//! Surface-form helpers: table-driven pluralization and sentence
//! capitalization. No real morphological analysis happens here; the plural
//! rules are a flat external table (`plural_rules.json`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One ordered suffix rewrite: strip `suffix`, append `replacement`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuffixRule {
    pub suffix: String,
    pub replacement: String,
}

/// Pluralization table. Lookup order: unchanged, irregular, first matching
/// suffix rule, then a plain `s`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluralRules {
    #[serde(default)]
    pub irregular: HashMap<String, String>,
    #[serde(default)]
    pub unchanged: Vec<String>,
    #[serde(default)]
    pub suffix_rules: Vec<SuffixRule>,
}

impl PluralRules {
    /// The built-in table, used when no `plural_rules.json` is present.
    /// Vowel+`y` rules precede the bare `y` rule, `fe` precedes `f`.
    pub fn builtin() -> Self {
        let irregular = [
            ("man", "men"),
            ("woman", "women"),
            ("child", "children"),
            ("person", "people"),
            ("foot", "feet"),
            ("tooth", "teeth"),
        ]
        .into_iter()
        .map(|(s, p)| (s.to_string(), p.to_string()))
        .collect();

        let unchanged = ["sheep", "deer", "fish", "species", "aircraft"]
            .into_iter()
            .map(String::from)
            .collect();

        let suffix_rules = [
            ("ay", "ays"),
            ("ey", "eys"),
            ("iy", "iys"),
            ("oy", "oys"),
            ("uy", "uys"),
            ("y", "ies"),
            ("ch", "ches"),
            ("sh", "shes"),
            ("fe", "ves"),
            ("f", "ves"),
            ("s", "ses"),
            ("x", "xes"),
            ("z", "zes"),
        ]
        .into_iter()
        .map(|(suffix, replacement)| SuffixRule {
            suffix: suffix.to_string(),
            replacement: replacement.to_string(),
        })
        .collect();

        Self {
            irregular,
            unchanged,
            suffix_rules,
        }
    }
}

/// Pluralize a lower-cased word through the rule table.
pub fn pluralize(word: &str, rules: &PluralRules) -> String {
    let word = word.to_lowercase();
    if rules.unchanged.iter().any(|w| w == &word) {
        return word;
    }
    if let Some(plural) = rules.irregular.get(&word) {
        return plural.clone();
    }
    for rule in &rules.suffix_rules {
        if let Some(stem) = word.strip_suffix(rule.suffix.as_str()) {
            return format!("{stem}{}", rule.replacement);
        }
    }
    format!("{word}s")
}

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
