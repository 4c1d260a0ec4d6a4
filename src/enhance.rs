//! Prediction enhancement pipeline and its adjacent state: emotional tones,
//! domain specialists, creativity settings, user profiles and conversation
//! history.
//!
//! Five stages run in a fixed order over the base candidates: context boost,
//! tone adaptation, domain specialization, creativity lift, personalization.
//! Every stage that rescores also re-sorts (stable, strongest first); stages
//! that decline to act hand the list through untouched.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use crate::context;
use crate::graph::Graph;
use crate::lexicon::Lexicon;
use crate::rank::{sort_descending, Candidate, ScoreBoard};

/// Exchanges kept in the conversation window.
pub const CONTEXT_WINDOW: usize = 10;

// ── Conversation history ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ConversationTurn {
    pub speaker: Speaker,
    pub text: String,
}

/// Rolling history of the last [`CONTEXT_WINDOW`] exchanges.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: VecDeque<ConversationTurn>,
}

impl ConversationHistory {
    pub fn push_exchange(&mut self, user: &str, reply: &str) {
        self.turns.push_back(ConversationTurn {
            speaker: Speaker::User,
            text: user.to_string(),
        });
        self.turns.push_back(ConversationTurn {
            speaker: Speaker::Assistant,
            text: reply.to_string(),
        });
        while self.turns.len() > CONTEXT_WINDOW * 2 {
            self.turns.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }
}

// ── Registries ──────────────────────────────────────────────────────────

/// One emotional tone: trigger words and a score multiplier.
#[derive(Debug, Clone)]
pub struct ToneProfile {
    pub name: String,
    pub weight: f64,
    pub words: Vec<String>,
}

fn tone(name: &str, weight: f64, words: &[&str]) -> ToneProfile {
    ToneProfile {
        name: name.to_string(),
        weight,
        words: words.iter().map(|w| w.to_string()).collect(),
    }
}

/// The built-in tone registry.
pub fn default_tones() -> Vec<ToneProfile> {
    vec![
        tone("formal", 1.0, &["therefore", "however", "thus"]),
        tone("casual", 0.8, &["hey", "cool", "awesome"]),
        tone("technical", 1.2, &["algorithm", "parameter", "execute"]),
        tone("empathetic", 1.1, &["understand", "feel", "support"]),
    ]
}

/// One domain specialist: a vocabulary and a score multiplier.
#[derive(Debug, Clone)]
pub struct Specialist {
    pub name: String,
    pub vocabulary: BTreeSet<String>,
    pub weight: f64,
}

impl Specialist {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            vocabulary: BTreeSet::new(),
            weight,
        }
    }
}

/// Per-user adaptation state.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub preferred_words: BTreeSet<String>,
    pub common_topics: BTreeMap<String, u64>,
    pub writing_style: String,
    pub learning_adaptation: f64,
    pub interaction_count: u64,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            preferred_words: BTreeSet::new(),
            common_topics: BTreeMap::new(),
            writing_style: "neutral".to_string(),
            learning_adaptation: 1.0,
            interaction_count: 0,
        }
    }
}

// ── Pipeline ────────────────────────────────────────────────────────────

/// Enhancement state and the five-stage pipeline over base predictions.
#[derive(Debug, Clone)]
pub struct Enhancer {
    pub tones: Vec<ToneProfile>,
    pub current_tone: String,
    pub specialists: Vec<Specialist>,
    pub current_domain: String,
    pub creativity_level: f64,
    pub creativity_boost: f64,
    pub current_user: String,
    profiles: HashMap<String, UserProfile>,
}

impl Default for Enhancer {
    fn default() -> Self {
        Self {
            tones: default_tones(),
            current_tone: "neutral".to_string(),
            specialists: vec![Specialist::new("general", 1.0)],
            current_domain: "general".to_string(),
            creativity_level: 0.5,
            creativity_boost: 0.3,
            current_user: "default".to_string(),
            profiles: HashMap::new(),
        }
    }
}

impl Enhancer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a domain specialist.
    pub fn register_specialist(&mut self, specialist: Specialist) {
        if let Some(existing) = self
            .specialists
            .iter_mut()
            .find(|s| s.name == specialist.name)
        {
            *existing = specialist;
        } else {
            self.specialists.push(specialist);
        }
    }

    /// Profile of the active user, created on first touch.
    pub fn profile_mut(&mut self) -> &mut UserProfile {
        self.profiles
            .entry(self.current_user.clone())
            .or_default()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profiles
            .get(&self.current_user)
            .or_else(|| self.profiles.get("default"))
    }

    pub fn mark_preferred(&mut self, word: &str) {
        self.profile_mut().preferred_words.insert(word.to_lowercase());
    }

    /// Count one exchange against the active profile.
    pub fn record_interaction(&mut self, topic: Option<&str>) {
        let profile = self.profile_mut();
        profile.interaction_count += 1;
        if let Some(topic) = topic {
            *profile.common_topics.entry(topic.to_string()).or_insert(0) += 1;
        }
    }

    /// Detect and store the dominant tone of a text. Tone words match whole
    /// whitespace-separated tokens; ties keep registry order.
    pub fn detect_tone(&mut self, text: &str) -> &str {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();
        let mut board: ScoreBoard<String> = ScoreBoard::new();
        for tone in &self.tones {
            for tone_word in &tone.words {
                if words.iter().any(|w| w == tone_word) {
                    board.add(tone.name.clone(), tone.weight);
                }
            }
        }
        self.current_tone = board
            .argmax()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| "neutral".to_string());
        &self.current_tone
    }

    /// Detect and store the dominant domain by vocabulary overlap.
    pub fn detect_domain(&mut self, text: &str) -> &str {
        let lowered = text.to_lowercase();
        let words: BTreeSet<&str> = lowered.split_whitespace().collect();
        let mut board: ScoreBoard<String> = ScoreBoard::new();
        for specialist in &self.specialists {
            let overlap = specialist
                .vocabulary
                .iter()
                .filter(|v| words.contains(v.as_str()))
                .count();
            board.add(specialist.name.clone(), overlap as f64 * specialist.weight);
        }
        self.current_domain = board
            .argmax()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| "general".to_string());
        &self.current_domain
    }

    fn contextual(
        &self,
        text: &str,
        mut predictions: Vec<Candidate>,
        lexicon: &Lexicon,
        graph: &Graph,
    ) -> Vec<Candidate> {
        let deduced = context::deduce(text, lexicon);
        for candidate in &mut predictions {
            let weight = graph.weight(&deduced.main_topic, &candidate.word);
            // Positive edges only; negative neighborhoods leave scores alone.
            if weight > 0.0 {
                candidate.score *= 1.0 + weight * 0.1;
            }
        }
        sort_descending(&mut predictions);
        predictions
    }

    fn adapt_to_tone(&self, mut predictions: Vec<Candidate>) -> Vec<Candidate> {
        if self.current_tone == "neutral" {
            return predictions;
        }
        let Some(tone) = self.tones.iter().find(|t| t.name == self.current_tone) else {
            return predictions;
        };
        for candidate in &mut predictions {
            if tone.words.iter().any(|w| w == &candidate.word) {
                candidate.score *= tone.weight;
            }
        }
        sort_descending(&mut predictions);
        predictions
    }

    fn domain_enhanced(&self, mut predictions: Vec<Candidate>) -> Vec<Candidate> {
        if self.current_domain == "general" {
            return predictions;
        }
        let Some(specialist) = self
            .specialists
            .iter()
            .find(|s| s.name == self.current_domain)
        else {
            return predictions;
        };
        for candidate in &mut predictions {
            if specialist.vocabulary.contains(&candidate.word) {
                candidate.score *= specialist.weight;
            }
        }
        sort_descending(&mut predictions);
        predictions
    }

    fn creative(&self, mut predictions: Vec<Candidate>) -> Vec<Candidate> {
        if self.creativity_level < 0.1 {
            return predictions;
        }
        for candidate in &mut predictions {
            if candidate.score < 0.7 {
                candidate.score *= 1.0 + self.creativity_boost;
            }
        }
        sort_descending(&mut predictions);
        predictions
    }

    fn personalized(&self, mut predictions: Vec<Candidate>) -> Vec<Candidate> {
        let Some(profile) = self.profile() else {
            return predictions;
        };
        if profile.preferred_words.is_empty() {
            return predictions;
        }
        for candidate in &mut predictions {
            if profile.preferred_words.contains(&candidate.word) {
                candidate.score *= 1.0 + profile.learning_adaptation * 0.2;
            }
        }
        sort_descending(&mut predictions);
        predictions
    }

    /// Run all five stages over base predictions. Tone and domain detection
    /// update the stored state as a side effect.
    pub fn enhance(
        &mut self,
        text: &str,
        base: Vec<Candidate>,
        lexicon: &Lexicon,
        graph: &Graph,
    ) -> Vec<Candidate> {
        let predictions = self.contextual(text, base, lexicon, graph);
        self.detect_tone(text);
        let predictions = self.adapt_to_tone(predictions);
        self.detect_domain(text);
        let predictions = self.domain_enhanced(predictions);
        let predictions = self.creative(predictions);
        self.personalized(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preds(pairs: &[(&str, f64)]) -> Vec<Candidate> {
        pairs.iter().map(|(w, s)| Candidate::new(*w, *s)).collect()
    }

    #[test]
    fn history_keeps_the_last_ten_exchanges() {
        let mut history = ConversationHistory::default();
        for i in 0..12 {
            history.push_exchange(&format!("q{i}"), &format!("a{i}"));
        }
        assert_eq!(history.len(), CONTEXT_WINDOW * 2);
        assert_eq!(history.iter().next().unwrap().text, "q2");
    }

    #[test]
    fn tone_detection_matches_whole_tokens_only() {
        let mut enhancer = Enhancer::new();
        assert_eq!(enhancer.detect_tone("run the algorithm now"), "technical");
        assert_eq!(enhancer.detect_tone("plain words here"), "neutral");
        // "algorithms" is not the token "algorithm".
        assert_eq!(enhancer.detect_tone("two algorithms"), "neutral");
    }

    #[test]
    fn neutral_tone_hands_predictions_through_unsorted() {
        let enhancer = Enhancer::new();
        let out = enhancer.adapt_to_tone(preds(&[("low", 0.1), ("high", 0.9)]));
        assert_eq!(out[0].word, "low");
    }

    #[test]
    fn technical_tone_boosts_and_resorts() {
        let mut enhancer = Enhancer::new();
        enhancer.detect_tone("execute the algorithm");
        let out = enhancer.adapt_to_tone(preds(&[("data", 0.5), ("execute", 0.45)]));
        assert_eq!(out[0].word, "execute");
        assert!((out[0].score - 0.54).abs() < 1e-9);
    }

    #[test]
    fn casual_tone_dampens_its_own_words() {
        let mut enhancer = Enhancer::new();
        enhancer.detect_tone("hey there");
        let out = enhancer.adapt_to_tone(preds(&[("cool", 0.5), ("data", 0.45)]));
        assert_eq!(out[0].word, "data");
        assert!((out[1].score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn context_boost_scales_by_topic_edge() {
        use crate::lexicon::{parse_feed_line, FeedLine};
        let mut lexicon = Lexicon::new();
        let FeedLine::Entry(w, e) = parse_feed_line("noun; data") else {
            panic!()
        };
        lexicon.insert(w, e);
        let mut graph = Graph::new();
        graph.add("data", "analyze", 2.0);
        graph.add("data", "skip", -1.5);

        let enhancer = Enhancer::new();
        let out = enhancer.contextual(
            "data",
            preds(&[("analyze", 0.5), ("skip", 0.5)]),
            &lexicon,
            &graph,
        );
        assert_eq!(out[0].word, "analyze");
        assert!((out[0].score - 0.6).abs() < 1e-9);
        // The negative edge to "skip" leaves its score untouched.
        assert!((out[1].score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn default_domain_stays_general_and_hands_through() {
        let mut enhancer = Enhancer::new();
        assert_eq!(enhancer.detect_domain("anything at all"), "general");
        let out = enhancer.domain_enhanced(preds(&[("low", 0.1), ("high", 0.9)]));
        assert_eq!(out[0].word, "low");
    }

    #[test]
    fn registered_specialist_wins_on_overlap_and_boosts() {
        let mut enhancer = Enhancer::new();
        let mut specialist = Specialist::new("networking", 1.5);
        specialist.vocabulary.insert("packet".to_string());
        specialist.vocabulary.insert("socket".to_string());
        enhancer.register_specialist(specialist);

        assert_eq!(enhancer.detect_domain("send the packet"), "networking");
        let out = enhancer.domain_enhanced(preds(&[("socket", 0.4), ("data", 0.5)]));
        assert_eq!(out[0].word, "socket");
        assert!((out[0].score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn creativity_lifts_only_sub_threshold_scores() {
        let enhancer = Enhancer::new();
        let out = enhancer.creative(preds(&[("strong", 0.8), ("weak", 0.65)]));
        // 0.65 * 1.3 = 0.845 overtakes the untouched 0.8.
        assert_eq!(out[0].word, "weak");
        assert!((out[0].score - 0.845).abs() < 1e-9);
        assert!((out[1].score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn zero_creativity_disables_the_stage() {
        let mut enhancer = Enhancer::new();
        enhancer.creativity_level = 0.0;
        let out = enhancer.creative(preds(&[("low", 0.1), ("high", 0.9)]));
        assert_eq!(out[0].word, "low");
    }

    #[test]
    fn personalization_needs_preferred_words() {
        let mut enhancer = Enhancer::new();
        let untouched = enhancer.personalized(preds(&[("low", 0.1), ("high", 0.9)]));
        assert_eq!(untouched[0].word, "low");

        enhancer.mark_preferred("low");
        let out = enhancer.personalized(preds(&[("low", 0.8), ("high", 0.9)]));
        // 0.8 * 1.2 = 0.96 with the default adaptation of 1.0.
        assert_eq!(out[0].word, "low");
        assert!((out[0].score - 0.96).abs() < 1e-9);
    }

    #[test]
    fn interactions_accumulate_on_the_profile() {
        let mut enhancer = Enhancer::new();
        enhancer.record_interaction(Some("computer"));
        enhancer.record_interaction(Some("computer"));
        enhancer.record_interaction(None);

        let profile = enhancer.profile().unwrap();
        assert_eq!(profile.interaction_count, 3);
        assert_eq!(profile.common_topics.get("computer"), Some(&2));
        assert_eq!(profile.writing_style, "neutral");
    }
}
