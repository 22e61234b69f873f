//! Order-stable frequency counting.

use std::collections::HashMap;

use crate::models::TermCount;

/// Term counts that remember the order terms were first seen in.
///
/// Ranking is by descending count; equal counts keep first-seen order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    index: HashMap<String, usize>,
    entries: Vec<TermCount>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `term`. Callers normalize before adding.
    pub fn add(&mut self, term: &str) {
        match self.index.get(term) {
            Some(&i) => self.entries[i].count += 1,
            None => {
                self.index.insert(term.to_string(), self.entries.len());
                self.entries.push(TermCount {
                    term: term.to_string(),
                    count: 1,
                });
            }
        }
    }

    pub fn count(&self, term: &str) -> usize {
        self.index.get(term).map_or(0, |&i| self.entries[i].count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `k` most frequent terms.
    pub fn top(&self, k: usize) -> Vec<TermCount> {
        let mut ranked = self.entries.clone();
        // stable: ties stay in first-seen order
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(k);
        ranked
    }
}

impl<S: AsRef<str>> Extend<S> for FrequencyTable {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for term in iter {
            self.add(term.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}
