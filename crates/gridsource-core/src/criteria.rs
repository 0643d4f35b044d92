//! Search criteria handed to source adapters

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Page size used when nothing else is configured
pub const DEFAULT_PAGE_SIZE: usize = 200;

static NEXT_CRITERIA_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one logical query: a criteria instance in one particular state
///
/// Two identities compare equal only when they come from the same instance
/// and no paging or filter setter ran in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CriteriaIdentity {
    instance: u64,
    revision: u64,
}

/// Paging and filtering directive for a source adapter
///
/// Every instance gets a process-unique identity; `clone` produces a fresh
/// one, so cached data never leaks between two criteria objects.
#[derive(Debug, PartialEq, Eq)]
pub struct SearchCriteria {
    instance: u64,
    revision: u64,
    page_size: usize,
    current_page: usize,
    filters: BTreeMap<String, String>,
}

impl SearchCriteria {
    /// Create criteria for the first page with the default page size
    pub fn new() -> Self {
        Self {
            instance: NEXT_CRITERIA_ID.fetch_add(1, Ordering::Relaxed),
            revision: 0,
            page_size: DEFAULT_PAGE_SIZE,
            current_page: 1,
            filters: BTreeMap::new(),
        }
    }

    pub fn identity(&self) -> CriteriaIdentity {
        CriteriaIdentity {
            instance: self.instance,
            revision: self.revision,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// 1-based page number
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Number of rows before the current page
    pub fn offset(&self) -> usize {
        (self.current_page - 1).saturating_mul(self.page_size)
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn filter(&self, field: &str) -> Option<&str> {
        self.filters.get(field).map(String::as_str)
    }

    /// Set the page size (clamped to at least one row)
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.revision += 1;
    }

    /// Set the 1-based page number (clamped to at least page one)
    pub fn set_current_page(&mut self, page: usize) {
        self.current_page = page.max(1);
        self.revision += 1;
    }

    pub fn set_filter(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.filters.insert(field.into(), value.into());
        self.revision += 1;
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.set_page_size(page_size);
        self
    }

    pub fn with_current_page(mut self, page: usize) -> Self {
        self.set_current_page(page);
        self
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_filter(field, value);
        self
    }
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SearchCriteria {
    fn clone(&self) -> Self {
        Self {
            page_size: self.page_size,
            current_page: self.current_page,
            filters: self.filters.clone(),
            ..Self::new()
        }
    }
}
