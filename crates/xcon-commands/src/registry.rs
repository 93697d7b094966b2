#![forbid(unsafe_code)]

//! Command registry with exact lookup and cyclic completion.
//!
//! The registry owns two views of the same name set: a sorted map for exact
//! lookup and ordered iteration, and a [`CommandTrie`] for completing
//! partial input. Only [`add`](CommandRegistry::add) and
//! [`remove`](CommandRegistry::remove) mutate either, always both together.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;

use crate::entry::CommandEntry;
use crate::trie::{CommandTrie, Toward};

/// Registry mutation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A command with this name is already registered.
    DuplicateName(String),
    /// No command with this name is registered.
    NotFound(String),
    /// Names must be non-empty and free of whitespace.
    InvalidName(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName(name) => write!(f, "command already registered: {name}"),
            Self::NotFound(name) => write!(f, "command not registered: {name}"),
            Self::InvalidName(name) => write!(f, "invalid command name: {name:?}"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Set of named commands.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    entries: BTreeMap<String, CommandEntry>,
    trie: CommandTrie,
}

impl CommandRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register `entry` under its name.
    pub fn add(&mut self, entry: CommandEntry) -> Result<(), RegistryError> {
        let name = entry.name();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidName(name.to_owned()));
        }
        if self.entries.contains_key(name) {
            return Err(RegistryError::DuplicateName(name.to_owned()));
        }
        tracing::debug!(command = name, "registering command");
        self.trie.insert(name);
        self.entries.insert(name.to_owned(), entry);
        Ok(())
    }

    /// Unregister `name`, returning its entry.
    ///
    /// # Panics
    ///
    /// Panics if the name index and the trie disagree about `name`.
    pub fn remove(&mut self, name: &str) -> Result<CommandEntry, RegistryError> {
        let entry = self
            .entries
            .remove(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_owned()))?;
        assert!(
            self.trie.remove(name),
            "command trie out of sync: {name:?} indexed but not in trie"
        );
        tracing::debug!(command = name, "unregistered command");
        Ok(entry)
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.get(name)
    }

    /// Mutable access for toggling flags; the name cannot change.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut CommandEntry> {
        self.entries.get_mut(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Completion forward from `input`.
    ///
    /// A registered name yields its successor, wrapping from the last name
    /// to the first. Anything else yields the trie's nearest synthesis.
    ///
    /// # Panics
    ///
    /// Panics when the registry is empty.
    #[must_use]
    pub fn find_next(&self, input: &str) -> String {
        assert!(!self.is_empty(), "find_next on an empty command registry");
        if self.contains(input) {
            let after = self
                .entries
                .range::<str, _>((Bound::Excluded(input), Bound::Unbounded))
                .next()
                .or_else(|| self.entries.iter().next());
            return after.map(|(name, _)| name.clone()).unwrap_or_default();
        }
        self.nearest(input, Toward::Next)
    }

    /// Completion backward from `input`; mirror of [`find_next`](Self::find_next).
    ///
    /// # Panics
    ///
    /// Panics when the registry is empty.
    #[must_use]
    pub fn find_prev(&self, input: &str) -> String {
        assert!(!self.is_empty(), "find_prev on an empty command registry");
        if self.contains(input) {
            let before = self
                .entries
                .range::<str, _>((Bound::Unbounded, Bound::Excluded(input)))
                .next_back()
                .or_else(|| self.entries.iter().next_back());
            return before.map(|(name, _)| name.clone()).unwrap_or_default();
        }
        self.nearest(input, Toward::Prev)
    }

    fn nearest(&self, input: &str, toward: Toward) -> String {
        let found = self.trie.nearest(input, toward).unwrap_or_default();
        tracing::trace!(input, found = %found, ?toward, "completion synthesized");
        found
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &CommandEntry> + '_ {
        self.entries.values()
    }

    pub fn names(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Read-only view of the completion trie.
    #[must_use]
    pub fn trie(&self) -> &CommandTrie {
        &self.trie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(names: &[&str]) -> CommandRegistry {
        let mut r = CommandRegistry::new();
        for name in names {
            r.add(CommandEntry::new(*name, |_, _| Ok(()))).unwrap();
        }
        r
    }

    // ==========================================================================
    // Mutation
    // ==========================================================================

    #[test]
    fn add_rejects_duplicates() {
        let mut r = registry(&["quit"]);
        let err = r.add(CommandEntry::new("quit", |_, _| Ok(()))).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("quit".into()));
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn add_rejects_bad_names() {
        let mut r = CommandRegistry::new();
        assert!(matches!(
            r.add(CommandEntry::new("", |_, _| Ok(()))),
            Err(RegistryError::InvalidName(_))
        ));
        assert!(matches!(
            r.add(CommandEntry::new("a b", |_, _| Ok(()))),
            Err(RegistryError::InvalidName(_))
        ));
        assert!(r.is_empty());
    }

    #[test]
    fn remove_keeps_views_in_step() {
        let mut r = registry(&["foo", "foobar"]);
        let removed = r.remove("foo").unwrap();
        assert_eq!(removed.name(), "foo");
        assert!(r.find("foo").is_none());
        assert!(!r.trie().contains("foo"));
        assert!(r.trie().contains("foobar"));
        assert_eq!(
            r.remove("foo").unwrap_err(),
            RegistryError::NotFound("foo".into())
        );
    }

    #[test]
    fn iteration_is_sorted() {
        let r = registry(&["gamma", "alpha", "beta"]);
        assert_eq!(r.names().collect::<Vec<_>>(), vec!["alpha", "beta", "gamma"]);
        assert_eq!(r.iter().next_back().map(CommandEntry::name), Some("gamma"));
    }

    #[test]
    fn find_mut_toggles_enabled() {
        let mut r = registry(&["x"]);
        r.find_mut("x").unwrap().set_enabled(false);
        assert!(!r.find("x").unwrap().flags().is_enabled());
    }

    // ==========================================================================
    // Completion
    // ==========================================================================

    #[test]
    fn exact_names_cycle() {
        let r = registry(&["alpha", "beta", "gamma"]);
        assert_eq!(r.find_next("beta"), "gamma");
        assert_eq!(r.find_next("gamma"), "alpha");
        assert_eq!(r.find_prev("alpha"), "gamma");
        assert_eq!(r.find_prev("gamma"), "beta");
    }

    #[test]
    fn partial_input_completes() {
        let r = registry(&["foo", "foobar", "goo"]);
        assert_eq!(r.find_next("foob"), "foobar");
        assert_eq!(r.find_next("fo"), "foo");
        assert_eq!(r.find_prev("h"), "goo");
    }

    #[test]
    fn backward_completion_may_stop_on_a_shorter_name() {
        // The end-of-name key sorts before 'o', so "fo" is the nearest
        // name below "foo" and wins over "fox".
        let r = registry(&["fo", "fox"]);
        assert_eq!(r.find_prev("foo"), "fo");
        assert_eq!(r.find_next("foo"), "fox");
    }

    #[test]
    fn single_entry_cycles_to_itself() {
        let r = registry(&["only"]);
        assert_eq!(r.find_next("only"), "only");
        assert_eq!(r.find_prev("only"), "only");
        assert_eq!(r.find_next(""), "only");
    }

    #[test]
    #[should_panic(expected = "empty command registry")]
    fn cycling_empty_registry_panics() {
        let _ = CommandRegistry::new().find_next("x");
    }
}
