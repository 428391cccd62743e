// src/task/requisites.rs

//! Named boolean conditions: the prerequisites an instance needs and the
//! postrequisites (outputs) it reports.
//!
//! Cross-task dependencies are plain text: a prerequisite label is the exact
//! postrequisite label of some upstream instance, so satisfying one set from
//! another is a string intersection. Nothing here refers to task objects.

/// Insertion-ordered set of unique labels, each satisfied or not.
///
/// Satisfaction only ever moves from `false` to `true`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequisiteSet {
    entries: Vec<(String, bool)>,
}

impl RequisiteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an all-unsatisfied set. Repeated labels collapse into one.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for label in labels {
            set.add(label);
        }
        set
    }

    /// Add an unsatisfied label; returns `false` if it was already present.
    pub fn add(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.exists(&label) {
            return false;
        }
        self.entries.push((label, false));
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn exists(&self, label: &str) -> bool {
        self.entries.iter().any(|(l, _)| l == label)
    }

    /// `false` for unknown labels.
    pub fn is_satisfied(&self, label: &str) -> bool {
        self.entries.iter().any(|(l, sat)| l == label && *sat)
    }

    /// Mark `label` satisfied. Returns `true` only if this call changed it;
    /// unknown labels are ignored.
    pub fn satisfy(&mut self, label: &str) -> bool {
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some((_, sat)) if !*sat => {
                *sat = true;
                true
            }
            _ => false,
        }
    }

    pub fn set_all_satisfied(&mut self) {
        for (_, sat) in self.entries.iter_mut() {
            *sat = true;
        }
    }

    /// True when every label is satisfied. An empty set is vacuously
    /// satisfied, so a kind with no prerequisites is ready at creation.
    pub fn all_satisfied(&self) -> bool {
        self.entries.iter().all(|(_, sat)| *sat)
    }

    pub fn satisfied_count(&self) -> usize {
        self.entries.iter().filter(|(_, sat)| *sat).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(l, sat)| (l.as_str(), *sat))
    }

    pub fn satisfied_labels(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, sat)| *sat)
            .map(|(l, _)| l.as_str())
    }

    /// Satisfy every label of ours that `other` holds as satisfied.
    ///
    /// Returns how many labels this call newly satisfied.
    pub fn satisfy_from(&mut self, other: &RequisiteSet) -> usize {
        let mut newly = 0;
        for (label, sat) in self.entries.iter_mut() {
            if !*sat && other.is_satisfied(label) {
                *sat = true;
                newly += 1;
            }
        }
        newly
    }

    /// Would satisfying from all of `sources` leave this set fully satisfied?
    ///
    /// Read-only: the receiver is never touched.
    pub fn would_satisfy_from<'a, I>(&self, sources: I) -> bool
    where
        I: IntoIterator<Item = &'a RequisiteSet>,
    {
        let sources: Vec<&RequisiteSet> = sources.into_iter().collect();
        self.entries
            .iter()
            .all(|(label, sat)| *sat || sources.iter().any(|s| s.is_satisfied(label)))
    }
}
