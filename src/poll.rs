//! Poll store: one poll's options, votes, and result computation.
//!
//! Pure and synchronous. The caller owns the poll and is responsible for
//! serializing access to it; see [`crate::bot::Data`].

use std::collections::HashMap;

use thiserror::Error;

/// Errors the poll store can return. All are expected and recoverable;
/// the command layer turns each into a user-facing reply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PollError {
    #[error("a poll needs at least two options, got {0}")]
    TooFewOptions(usize),

    #[error("duplicate option label: {0}")]
    DuplicateOption(String),

    #[error("unknown option for this poll: {0}")]
    UnknownOption(String),

    #[error("voter {0} already voted on this poll")]
    AlreadyVoted(String),
}

/// One voter's single, immutable choice of option. Never mutated after
/// insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub option: String,
    pub voter: String,
}

/// A single round of voting: a fixed set of options and accumulating votes.
///
/// Invariants: every recorded vote's option is a member of `options`, and no
/// voter identifier appears in more than one vote across the whole poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    description: String,
    options: Vec<String>,
    votes: HashMap<String, Vec<Vote>>,
}

impl Poll {
    /// Creates a poll with the given description and option labels.
    ///
    /// # Errors
    ///
    /// Returns [`PollError::TooFewOptions`] when fewer than two options are
    /// supplied, and [`PollError::DuplicateOption`] when a label repeats.
    /// Votes are keyed by label, so duplicate labels cannot be distinct
    /// voting slots.
    pub fn new(
        description: impl Into<String>,
        options: Vec<String>,
    ) -> Result<Self, PollError> {
        if options.len() < 2 {
            return Err(PollError::TooFewOptions(options.len()));
        }

        for (idx, option) in options.iter().enumerate() {
            if options[..idx].contains(option) {
                return Err(PollError::DuplicateOption(option.clone()));
            }
        }

        Ok(Self {
            description: description.into(),
            options,
            votes: HashMap::new(),
        })
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Returns true when the voter already has a recorded vote anywhere in
    /// this poll. Linear scan; fine at chat-channel scale.
    #[must_use]
    pub fn has_voted(&self, voter: &str) -> bool {
        self.votes
            .values()
            .flatten()
            .any(|vote| vote.voter == voter)
    }

    /// Records a vote for `option` by `voter`.
    ///
    /// Voter uniqueness is checked before option validity, so a voter who
    /// already voted gets [`PollError::AlreadyVoted`] even for an unknown
    /// option.
    ///
    /// # Errors
    ///
    /// Returns [`PollError::AlreadyVoted`] when the voter already has a
    /// recorded vote, and [`PollError::UnknownOption`] when the option is
    /// not part of this poll. On error no vote is recorded.
    pub fn cast_vote(&mut self, option: &str, voter: &str) -> Result<(), PollError> {
        if self.has_voted(voter) {
            return Err(PollError::AlreadyVoted(voter.to_string()));
        }

        if !self.options.iter().any(|o| o == option) {
            return Err(PollError::UnknownOption(option.to_string()));
        }

        self.votes.entry(option.to_string()).or_default().push(Vote {
            option: option.to_string(),
            voter: voter.to_string(),
        });

        Ok(())
    }

    /// Number of votes recorded for a single option.
    #[must_use]
    pub fn vote_count(&self, option: &str) -> usize {
        self.votes.get(option).map_or(0, Vec::len)
    }

    /// Total votes recorded across all options.
    #[must_use]
    pub fn total_votes(&self) -> usize {
        self.votes.values().map(Vec::len).sum()
    }

    /// Per-option vote counts, in option order.
    #[must_use]
    pub fn tally(&self) -> Vec<(&str, usize)> {
        self.options
            .iter()
            .map(|option| (option.as_str(), self.vote_count(option)))
            .collect()
    }

    /// Returns the options tied for the highest vote count, in option order.
    ///
    /// A poll with no votes yields an empty result: zero-vote options are
    /// never winners.
    #[must_use]
    pub fn results(&self) -> Vec<String> {
        let max = self
            .options
            .iter()
            .map(|option| self.vote_count(option))
            .max()
            .unwrap_or(0);

        if max == 0 {
            return Vec::new();
        }

        self.options
            .iter()
            .filter(|option| self.vote_count(option) == max)
            .cloned()
            .collect()
    }
}
