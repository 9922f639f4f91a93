// 🧮 Grouping Engine - Lines → person groups
// Single pass state machine; the only state is the current group

use crate::amount::extract_amount;
use crate::classifier::{KeywordClassifier, LineClassifier, LineKind};
use crate::model::{DocumentResult, ExpenseEntry, PersonGroup};
use std::collections::HashMap;

/// Accumulates groups in first-seen order.
///
/// `groups` is append-only and `index` maps a name to its position in it, so
/// lookup by name and first-seen ordering never depend on map iteration order.
pub struct GroupingEngine<'a> {
    classifier: &'a dyn LineClassifier,
    title: Option<String>,
    groups: Vec<PersonGroup>,
    index: HashMap<String, usize>,
    current: Option<usize>,
    next_sequence: u32,
    dropped: usize,
}

impl<'a> GroupingEngine<'a> {
    pub fn new(classifier: &'a dyn LineClassifier) -> Self {
        GroupingEngine {
            classifier,
            title: None,
            groups: Vec::new(),
            index: HashMap::new(),
            current: None,
            next_sequence: 1,
            dropped: 0,
        }
    }

    /// Feed one line of extracted text
    pub fn push_line(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }

        match self.classifier.classify(line) {
            LineKind::Title => {
                self.title = Some(self.classifier.clean(line));
            }
            LineKind::NameLine => {
                let name = line.trim();
                let position = match self.index.get(name).copied() {
                    Some(position) => position,
                    None => self.open_group(name),
                };
                self.current = Some(position);
            }
            LineKind::Description => match self.current {
                Some(position) => {
                    let entry = ExpenseEntry::new(self.classifier.clean(line), extract_amount(line));
                    self.groups[position].push(entry);
                }
                None => {
                    self.dropped += 1;
                    tracing::debug!("Dropping expense line before any name: {:?}", line);
                }
            },
        }
    }

    fn open_group(&mut self, name: &str) -> usize {
        let position = self.groups.len();
        tracing::debug!("Opening group #{} for {:?}", self.next_sequence, name);

        self.groups
            .push(PersonGroup::new(self.next_sequence, name.to_string()));
        self.index.insert(name.to_string(), position);
        self.next_sequence += 1;
        position
    }

    /// Number of expense lines dropped because no name preceded them
    pub fn dropped_lines(&self) -> usize {
        self.dropped
    }

    pub fn finish(self) -> DocumentResult {
        if self.dropped > 0 {
            tracing::info!(
                "{} expense line(s) appeared before any name and were skipped",
                self.dropped
            );
        }

        DocumentResult {
            title: self
                .title
                .unwrap_or_else(|| self.classifier.default_title().to_string()),
            groups: self.groups,
        }
    }
}

/// Group lines with an explicit classifier
pub fn group_with<I, S>(lines: I, classifier: &dyn LineClassifier) -> DocumentResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut engine = GroupingEngine::new(classifier);
    for line in lines {
        engine.push_line(line.as_ref());
    }
    engine.finish()
}

/// Group lines with the default keyword classifier
pub fn group<I, S>(lines: I) -> DocumentResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    group_with(lines, &KeywordClassifier::default())
}

// ============================================================================
// TESTS
// ============================================================================
