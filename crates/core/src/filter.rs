// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener filters
//!
//! A listener names up to three attributes it cares about (type, source,
//! destination). Each is either a wildcard or an exact value.

use crate::event::{EntityId, Event};

/// A single filter field
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter<T> {
    /// Matches anything
    Any,
    /// Matches only this value
    Exact(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::Any
    }
}

impl<T> From<Option<T>> for Filter<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Filter::Any, Filter::Exact)
    }
}

impl<T> Filter<T> {
    pub fn is_any(&self) -> bool {
        matches!(self, Filter::Any)
    }

    /// Check the filter against an extracted attribute
    pub fn accepts(&self, predicate: impl FnOnce(&T) -> bool) -> bool {
        match self {
            Filter::Any => true,
            Filter::Exact(expected) => predicate(expected),
        }
    }
}

impl<T: PartialEq> Filter<T> {
    pub fn matches(&self, value: &T) -> bool {
        self.accepts(|expected| expected == value)
    }
}

/// The (type, from, to) filter of one listener registration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListenerFilter {
    pub event_type: Filter<String>,
    pub from: Filter<EntityId>,
    pub to: Filter<EntityId>,
}

impl ListenerFilter {
    /// Filter that matches every event
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Filter::Exact(event_type.into());
        self
    }

    pub fn with_from(mut self, from: impl Into<EntityId>) -> Self {
        self.from = Filter::Exact(from.into());
        self
    }

    pub fn with_to(mut self, to: impl Into<EntityId>) -> Self {
        self.to = Filter::Exact(to.into());
        self
    }

    /// Check every non-wildcard field against the event
    ///
    /// The `to` field matches when the event's recipient set contains the
    /// value, so an exact `to` never matches a publish/subscribe event.
    pub fn matches(&self, event: &Event) -> bool {
        self.event_type
            .accepts(|expected| expected == event.event_type())
            && self.from.matches(event.from())
            && self.to.accepts(|expected| event.to().contains(expected))
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
