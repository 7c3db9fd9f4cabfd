//! Interned trie with failure links for multi-pattern exact matching
//!
//! This crate implements the classic Aho-Corasick construction specialized
//! for literal-identifier workloads: a set of literal strings (DOIs) is
//! loaded once into an [`AutomatonBuilder`], frozen into an immutable
//! [`Automaton`], and then scanned against many short texts. A scan reports
//! every occurrence of every pattern, including overlapping occurrences, in
//! a single left-to-right pass over the text.
//!
//! # Design
//!
//! Construction uses per-state hash maps so inserts stay cheap while the
//! trie is growing. [`AutomatonBuilder::build`] computes failure links with
//! a breadth-first pass, flattens each state's output set by inheriting the
//! outputs of its failure target, and freezes every state into a sorted edge
//! array probed by binary search. The frozen automaton is read-only and can
//! be shared freely across threads.
//!
//! Patterns are interned: adding the same literal twice returns the original
//! pattern id rather than growing the automaton, so callers can key
//! per-pattern payload tables by id.
//!
//! # Example
//!
//! ```rust
//! use doimatch_ac::AutomatonBuilder;
//!
//! let mut builder = AutomatonBuilder::new();
//! let id = builder.add_pattern("10.1234/abc")?;
//! let automaton = builder.build()?;
//!
//! assert_eq!(automaton.find_exact("10.1234/abc"), Some(id));
//! assert_eq!(automaton.find_exact("10.1234/abcdef"), None);
//! # Ok::<(), doimatch_ac::AcError>(())
//! ```

use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Error type for automaton construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcError {
    /// An empty literal was added as a pattern.
    EmptyPattern,
    /// `build()` was called before any pattern was added.
    EmptyPatternSet,
}

impl fmt::Display for AcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcError::EmptyPattern => write!(f, "empty pattern literal"),
            AcError::EmptyPatternSet => write!(f, "automaton built with no patterns"),
        }
    }
}

impl std::error::Error for AcError {}

/// Mutable state used while the trie is under construction.
#[derive(Debug, Default)]
struct BuilderState {
    transitions: HashMap<u8, u32>,
    failure: u32,
    outputs: Vec<u32>,
}

/// Builder for an [`Automaton`].
///
/// Collects literal patterns into a byte trie; [`build`](Self::build)
/// finalizes it. Inserting a literal that is already present is a no-op
/// that returns the existing pattern id.
pub struct AutomatonBuilder {
    states: Vec<BuilderState>,
    patterns: Vec<String>,
    interned: HashMap<String, u32>,
}

impl AutomatonBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            states: vec![BuilderState::default()], // root
            patterns: Vec::new(),
            interned: HashMap::new(),
        }
    }

    /// Add a literal pattern, returning its pattern id.
    ///
    /// Ids are dense and assigned in first-insertion order, so callers can
    /// index side tables by id. Re-adding a known literal returns the id it
    /// was first assigned.
    pub fn add_pattern(&mut self, pattern: &str) -> Result<u32, AcError> {
        if pattern.is_empty() {
            return Err(AcError::EmptyPattern);
        }
        if let Some(&id) = self.interned.get(pattern) {
            return Ok(id);
        }

        let id = self.patterns.len() as u32;
        let mut current = 0u32;
        for &byte in pattern.as_bytes() {
            current = match self.states[current as usize].transitions.get(&byte) {
                Some(&next) => next,
                None => {
                    let next = self.states.len() as u32;
                    self.states.push(BuilderState::default());
                    self.states[current as usize].transitions.insert(byte, next);
                    next
                }
            };
        }
        self.states[current as usize].outputs.push(id);
        self.interned.insert(pattern.to_string(), id);
        self.patterns.push(pattern.to_string());
        Ok(id)
    }

    /// Number of distinct patterns added so far.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True if no pattern has been added.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Freeze the trie into an immutable [`Automaton`].
    pub fn build(mut self) -> Result<Automaton, AcError> {
        if self.patterns.is_empty() {
            return Err(AcError::EmptyPatternSet);
        }
        self.link_failures();

        let states = self
            .states
            .into_iter()
            .map(|state| {
                let mut edges: Vec<(u8, u32)> = state.transitions.into_iter().collect();
                edges.sort_unstable_by_key(|&(byte, _)| byte);
                State {
                    edges: edges.into_boxed_slice(),
                    failure: state.failure,
                    outputs: state.outputs.into_boxed_slice(),
                }
            })
            .collect();

        Ok(Automaton {
            states,
            patterns: self.patterns.into_boxed_slice(),
        })
    }

    /// Compute failure links breadth-first and flatten output sets.
    ///
    /// States are visited in increasing depth, so a state's failure target is
    /// always fully linked before the state itself; inheriting the target's
    /// outputs once is therefore equivalent to walking the whole suffix
    /// chain at query time.
    fn link_failures(&mut self) {
        let mut queue = VecDeque::new();

        // Depth-1 states fail to the root.
        for &child in self.states[0].transitions.values() {
            queue.push_back(child);
        }

        while let Some(state_id) = queue.pop_front() {
            let transitions: Vec<(u8, u32)> = self.states[state_id as usize]
                .transitions
                .iter()
                .map(|(&byte, &next)| (byte, next))
                .collect();

            for (byte, next) in transitions {
                queue.push_back(next);

                // Longest proper suffix of `next`'s path that is also a
                // trie prefix: follow failure links until a state with a
                // `byte` transition turns up, or the root gives out.
                let mut fail = self.states[state_id as usize].failure;
                let target = loop {
                    if let Some(&t) = self.states[fail as usize].transitions.get(&byte) {
                        break t;
                    }
                    if fail == 0 {
                        break 0;
                    }
                    fail = self.states[fail as usize].failure;
                };
                self.states[next as usize].failure = target;

                let inherited = self.states[target as usize].outputs.clone();
                self.states[next as usize].outputs.extend(inherited);
            }
        }
    }
}

impl Default for AutomatonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One frozen automaton state: sorted edges plus flattened outputs.
#[derive(Debug)]
struct State {
    edges: Box<[(u8, u32)]>,
    failure: u32,
    outputs: Box<[u32]>,
}

impl State {
    fn target(&self, byte: u8) -> Option<u32> {
        self.edges
            .binary_search_by_key(&byte, |&(b, _)| b)
            .ok()
            .map(|idx| self.edges[idx].1)
    }
}

/// A substring occurrence reported by [`Automaton::find_iter`].
///
/// Offsets are byte offsets into the scanned text; `end` is exclusive, so
/// `text[start..end]` is the matched pattern literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Id of the matched pattern, as returned by
    /// [`AutomatonBuilder::add_pattern`].
    pub pattern: u32,
    /// Byte offset of the first matched byte.
    pub start: usize,
    /// Byte offset one past the last matched byte.
    pub end: usize,
}

/// Immutable multi-pattern matcher.
///
/// Built once via [`AutomatonBuilder::build`]; queries never mutate it.
#[derive(Debug)]
pub struct Automaton {
    states: Box<[State]>,
    patterns: Box<[String]>,
}

impl Automaton {
    /// Number of distinct patterns in the automaton.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// The literal for a pattern id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this automaton's builder.
    pub fn pattern(&self, id: u32) -> &str {
        &self.patterns[id as usize]
    }

    /// Lazily iterate every pattern occurrence in `text`.
    ///
    /// Runs in time linear in `text.len()` plus the number of matches and
    /// yields overlapping occurrences. No match set is materialized up
    /// front, so scanning long texts stays cheap even when they are dense
    /// with hits.
    pub fn find_iter<'a, 't>(&'a self, text: &'t str) -> FindIter<'a, 't> {
        FindIter {
            automaton: self,
            text: text.as_bytes(),
            pos: 0,
            state: 0,
            emitted: 0,
        }
    }

    /// Full-span lookup: the pattern id whose literal equals `text` exactly.
    ///
    /// A hit requires the occurrence to cover all of `text`: a pattern that
    /// is merely contained in `text`, or that `text` is a prefix of, does
    /// not qualify. Comparison is case-sensitive with whitespace as given.
    pub fn find_exact(&self, text: &str) -> Option<u32> {
        self.find_iter(text)
            .find(|m| m.start == 0 && m.end == text.len())
            .map(|m| m.pattern)
    }

    fn next_state(&self, mut state: u32, byte: u8) -> u32 {
        loop {
            if let Some(target) = self.states[state as usize].target(byte) {
                return target;
            }
            if state == 0 {
                return 0;
            }
            state = self.states[state as usize].failure;
        }
    }
}

/// Lazy iterator over pattern occurrences, created by
/// [`Automaton::find_iter`].
pub struct FindIter<'a, 't> {
    automaton: &'a Automaton,
    text: &'t [u8],
    /// Bytes consumed so far; pending matches end here.
    pos: usize,
    state: u32,
    /// Outputs of the current state already handed out.
    emitted: usize,
}

impl Iterator for FindIter<'_, '_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        loop {
            let outputs = &self.automaton.states[self.state as usize].outputs;
            if self.emitted < outputs.len() {
                let id = outputs[self.emitted];
                self.emitted += 1;
                let len = self.automaton.patterns[id as usize].len();
                return Some(Match {
                    pattern: id,
                    start: self.pos - len,
                    end: self.pos,
                });
            }

            let &byte = self.text.get(self.pos)?;
            self.state = self.automaton.next_state(self.state, byte);
            self.pos += 1;
            self.emitted = 0;
        }
    }
}
