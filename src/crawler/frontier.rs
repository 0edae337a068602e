//! Breadth-first frontier of URLs awaiting a visit attempt
//!
//! URLs leave in insertion order. A membership set rejects candidates that
//! are already waiting; what "already waiting" means depends on the
//! configured [`FrontierDedup`] mode. Membership ends when a URL is popped,
//! whatever the outcome of its visit.

use crate::crawler::types::FrontierDedup;
use crate::url::NormalizedKey;
use std::collections::{HashSet, VecDeque};

#[derive(Debug)]
struct Entry {
    url: String,
    member: String,
}

/// FIFO queue of raw URL strings
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<Entry>,
    members: HashSet<String>,
    dedup: FrontierDedup,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new(dedup: FrontierDedup) -> Self {
        Self {
            queue: VecDeque::new(),
            members: HashSet::new(),
            dedup,
        }
    }

    /// Appends `url` unless an equivalent entry is already waiting
    ///
    /// Returns true if the URL was queued.
    pub fn push(&mut self, url: String, key: &NormalizedKey) -> bool {
        let member = match self.dedup {
            FrontierDedup::Raw => url.clone(),
            FrontierDedup::Normalized => key.as_str().to_string(),
        };

        if !self.members.insert(member.clone()) {
            return false;
        }

        self.queue.push_back(Entry { url, member });
        true
    }

    /// Removes and returns the earliest-queued URL
    pub fn pop(&mut self) -> Option<String> {
        let entry = self.queue.pop_front()?;
        self.members.remove(&entry.member);
        Some(entry.url)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
