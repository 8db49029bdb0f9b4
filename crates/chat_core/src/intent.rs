//! Intent detection for submitted input.
//!
//! Each [`IntentClassifier`] either recognizes an input or passes. The
//! [`IntentRouter`] asks its classifiers in order and falls back to a plain
//! chat intent when none of them claims the input.

use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

/// Case-insensitive, unanchored, greedy: `from a to b to c` yields `a to b` / `c`.
static ROUTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)from (.+) to (.+)").expect("ROUTE_PATTERN is a valid static regex pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Relay the query to the chat endpoint unchanged.
    Chat { query: String },
    /// Look up a route between two places.
    Route { origin: String, destination: String },
}

pub trait IntentClassifier: Send + Sync + fmt::Debug {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Returns `Some` when this classifier claims the (already trimmed) input.
    fn classify(&self, input: &str) -> Option<Intent>;
}

/// Recognizes `from <origin> to <destination>` anywhere in the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutePatternClassifier;

impl IntentClassifier for RoutePatternClassifier {
    fn name(&self) -> &'static str {
        "route-pattern"
    }

    fn classify(&self, input: &str) -> Option<Intent> {
        let captures = ROUTE_PATTERN.captures(input)?;
        let origin = captures.get(1)?.as_str().trim();
        let destination = captures.get(2)?.as_str().trim();
        Some(Intent::Route {
            origin: origin.to_string(),
            destination: destination.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct IntentRouter {
    classifiers: Vec<Arc<dyn IntentClassifier>>,
}

impl IntentRouter {
    /// Router with no classifiers: everything is chat.
    pub fn empty() -> Self {
        Self {
            classifiers: Vec::new(),
        }
    }

    /// Appends a classifier; earlier classifiers win.
    pub fn with_classifier(mut self, classifier: impl IntentClassifier + 'static) -> Self {
        self.classifiers.push(Arc::new(classifier));
        self
    }

    pub fn classify(&self, input: &str) -> Intent {
        for classifier in &self.classifiers {
            if let Some(intent) = classifier.classify(input) {
                chat_logging::chat_debug!("input claimed by classifier {}", classifier.name());
                return intent;
            }
        }
        Intent::Chat {
            query: input.to_string(),
        }
    }
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::empty().with_classifier(RoutePatternClassifier)
    }
}
