//! Listing extraction.
//!
//! Both providers go through the same two steps: pull [`RawEntry`] values out
//! of the page in document order, then [`ListingExtractor::scan`] judges each
//! entry and collects accepted records up to the cap. Only the per-provider
//! parts (which elements to read, which entries to reject) differ.

use crate::dom::{Document, Element};
use crate::normalize::normalize;
use crate::selectors::Selectors;
use crate::ResultRecord;
use socli_common::Provider;

const QUESTION_MARKER: &str = "Q: ";
const ENGINE_TITLE_SUFFIX: &str = " - Stack Overflow";

/// What a listing block looked like before any judgement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: String,
    pub summary: String,
    pub href: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No anchor in the block.
    MissingLink,
    /// A search-engine card without a description (instant answers, panels).
    InstantAnswer,
    /// The link is not a question or answer URL.
    NotContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Accepted(ResultRecord),
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingExtractor {
    /// The site's own search page: relative links, tag labels.
    Native,
    /// Site-restricted search-engine page: wrapped absolute links.
    SearchEngine,
}

impl ListingExtractor {
    pub fn for_provider(provider: Provider) -> Self {
        match provider {
            Provider::StackOverflow => Self::Native,
            Provider::Google => Self::SearchEngine,
        }
    }

    /// Raw entries in document order. Empty when the result containers are
    /// missing from the page.
    pub fn extract(self, doc: &Document, selectors: &Selectors) -> Vec<RawEntry> {
        match self {
            Self::Native => doc
                .find_all(&selectors.result_container)
                .into_iter()
                .map(|block| native_entry(block, selectors))
                .collect(),
            Self::SearchEngine => doc
                .find_all(&selectors.engine_result)
                .into_iter()
                .map(|block| engine_entry(block, selectors))
                .collect(),
        }
    }

    pub fn judge(self, entry: RawEntry) -> Candidate {
        let Some(href) = entry.href.filter(|h| !h.trim().is_empty()) else {
            return Candidate::Rejected(RejectReason::MissingLink);
        };
        let target_ref = match self {
            Self::Native => href,
            Self::SearchEngine => {
                if entry.summary.is_empty() {
                    return Candidate::Rejected(RejectReason::InstantAnswer);
                }
                match normalize(&href) {
                    Some(url) => url,
                    None => return Candidate::Rejected(RejectReason::NotContent),
                }
            }
        };
        Candidate::Accepted(ResultRecord {
            title: entry.title,
            summary: entry.summary,
            target_ref,
            tags: entry.tags,
        })
    }

    /// Judge entries in order until `cap` are accepted. Rejected entries do
    /// not use up a slot.
    pub fn scan(self, entries: Vec<RawEntry>, cap: usize) -> Vec<ResultRecord> {
        let mut records = Vec::with_capacity(cap.min(entries.len()));
        for (position, entry) in entries.into_iter().enumerate() {
            if records.len() >= cap {
                break;
            }
            match self.judge(entry) {
                Candidate::Accepted(record) => records.push(record),
                Candidate::Rejected(reason) => {
                    tracing::debug!(position, ?reason, extractor = ?self, "search.candidate.rejected");
                }
            }
        }
        records
    }
}

fn native_entry(block: Element<'_>, selectors: &Selectors) -> RawEntry {
    let link = block
        .find_first(&selectors.result_title_link)
        .or_else(|| block.find_first(&selectors.any_link));
    let title = link.map(|a| a.clean_text()).unwrap_or_default();
    RawEntry {
        title: title
            .strip_prefix(QUESTION_MARKER)
            .map(str::to_string)
            .unwrap_or(title),
        summary: block
            .find_first(&selectors.result_excerpt)
            .map(|e| e.clean_text())
            .unwrap_or_default(),
        href: link.and_then(|a| a.attr("href")).map(str::to_string),
        tags: block
            .find_all(&selectors.result_tag)
            .into_iter()
            .map(|t| t.clean_text())
            .filter(|t| !t.is_empty())
            .collect(),
    }
}

fn engine_entry(block: Element<'_>, selectors: &Selectors) -> RawEntry {
    let title = block
        .find_first(&selectors.engine_title)
        .map(|h| h.clean_text())
        .unwrap_or_default();
    RawEntry {
        title: title
            .strip_suffix(ENGINE_TITLE_SUFFIX)
            .map(str::to_string)
            .unwrap_or(title),
        summary: block
            .find_first(&selectors.engine_description)
            .map(|d| d.clean_text())
            .unwrap_or_default(),
        href: block
            .find_first(&selectors.engine_link)
            .and_then(|a| a.attr("href"))
            .map(str::to_string),
        tags: Vec::new(),
    }
}
