//! Faceted filter engine for the video catalog.
//!
//! [`filter`] narrows a collection by category, tag set, language, and
//! free-text search. All clauses are AND'd together and a clause whose query
//! field is unset is skipped. The engine is a pure function: input order is
//! preserved and nothing is mutated.
//!
//! Text comparisons use Unicode simple lower-casing (`str::to_lowercase`) on
//! both sides, so `"ÉPICO"` finds `"épico"`. This is not full case folding:
//! `"ß"` does not match `"ss"`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::video::VideoRecord;

// ---------------------------------------------------------------------------
// Filterable
// ---------------------------------------------------------------------------

/// Anything the filter engine can evaluate a facet query against.
pub trait Filterable {
    fn title(&self) -> &str;
    fn description(&self) -> Option<&str>;
    fn language(&self) -> &str;
    fn has_category(&self, slug: &str) -> bool;
    fn tag_names(&self) -> impl Iterator<Item = &str>;
}

impl Filterable for VideoRecord {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn language(&self) -> &str {
        &self.language
    }

    fn has_category(&self, slug: &str) -> bool {
        VideoRecord::has_category(self, slug)
    }

    fn tag_names(&self) -> impl Iterator<Item = &str> {
        VideoRecord::tag_names(self)
    }
}

// ---------------------------------------------------------------------------
// FacetQuery
// ---------------------------------------------------------------------------

/// The user's current filter selection.
///
/// Empty strings are treated the same as unset fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetQuery {
    /// Category slug the video must belong to.
    pub category: Option<String>,
    /// A video matches if it carries at least one of these tag names.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Language code, compared case-insensitively.
    pub language: Option<String>,
    /// Free-text search over title, description and tag names.
    pub search: Option<String>,
}

impl FacetQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, slug: impl Into<String>) -> Self {
        self.category = Some(slug.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.language = Some(code.into());
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Select a category, or `None` for all categories.
    pub fn select_category(&mut self, slug: Option<String>) {
        self.category = slug;
    }

    /// Add the tag if absent, remove it if present.
    pub fn toggle_tag(&mut self, name: &str) {
        if !self.tags.remove(name) {
            self.tags.insert(name.to_string());
        }
    }

    /// Select a language; selecting the active language again clears it.
    pub fn toggle_language(&mut self, code: &str) {
        if self.language.as_deref() == Some(code) {
            self.language = None;
        } else {
            self.language = Some(code.to_string());
        }
    }

    /// Reset category, tags and language. The search text is kept.
    pub fn clear(&mut self) {
        self.category = None;
        self.tags.clear();
        self.language = None;
    }

    /// Whether any of category, tags or language narrows the result.
    pub fn is_active(&self) -> bool {
        non_empty(self.category.as_deref()).is_some()
            || !self.tags.is_empty()
            || non_empty(self.language.as_deref()).is_some()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// A facet query with its comparison keys computed once per evaluation.
struct PreparedQuery<'q> {
    category: Option<&'q str>,
    tags: &'q BTreeSet<String>,
    language: Option<String>,
    search: Option<String>,
}

impl<'q> PreparedQuery<'q> {
    fn new(query: &'q FacetQuery) -> Self {
        Self {
            category: non_empty(query.category.as_deref()),
            tags: &query.tags,
            language: non_empty(query.language.as_deref()).map(str::to_lowercase),
            search: query
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase),
        }
    }

    fn matches<T: Filterable + ?Sized>(&self, video: &T) -> bool {
        if let Some(slug) = self.category {
            if !video.has_category(slug) {
                return false;
            }
        }

        if !self.tags.is_empty() && !video.tag_names().any(|name| self.tags.contains(name)) {
            return false;
        }

        if let Some(language) = &self.language {
            if video.language().to_lowercase() != *language {
                return false;
            }
        }

        if let Some(needle) = &self.search {
            let in_title = video.title().to_lowercase().contains(needle.as_str());
            let in_description = video
                .description()
                .is_some_and(|d| d.to_lowercase().contains(needle.as_str()));
            let in_tags = || {
                video
                    .tag_names()
                    .any(|name| name.to_lowercase().contains(needle.as_str()))
            };
            if !in_title && !in_description && !in_tags() {
                return false;
            }
        }

        true
    }
}

/// Whether a single video satisfies every active clause of `query`.
pub fn matches<T: Filterable + ?Sized>(video: &T, query: &FacetQuery) -> bool {
    PreparedQuery::new(query).matches(video)
}

/// Narrow `videos` to those matching `query`, preserving input order.
pub fn filter<'a, T: Filterable>(videos: &'a [T], query: &FacetQuery) -> Vec<&'a T> {
    let prepared = PreparedQuery::new(query);
    videos.iter().filter(|v| prepared.matches(*v)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
