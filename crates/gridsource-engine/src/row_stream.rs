//! Paginated row stream
//!
//! Turns a paged source into one forward-only sequence of `(index, record)`
//! pairs. Only the current page is held in memory; the next page is fetched
//! when the consumer has drained the previous one.

use crate::error::GridError;
use crate::grid_source::GridSource;
use gridsource_catalog::SourceAdapter;
use gridsource_core::{SearchCriteria, DEFAULT_PAGE_SIZE};

/// Lazy, single-pass stream over every row of a grid source
///
/// The stream stops when the number of yielded rows reaches the total the
/// source reports, or as soon as a page comes back empty, whichever happens
/// first. After an error the stream is finished.
///
/// ```rust,ignore
/// let mut rows = source.stream(SearchCriteria::new());
/// while let Some(row) = rows.next().await {
///     let (index, record) = row?;
/// }
/// ```
pub struct RowStream<'a, A: SourceAdapter> {
    source: &'a mut GridSource<A>,
    criteria: SearchCriteria,
    page: std::vec::IntoIter<A::Record>,
    started: bool,
    yielded: usize,
    finished: bool,
}

impl<'a, A: SourceAdapter> RowStream<'a, A> {
    /// Stream from page one with the default page size
    pub fn new(source: &'a mut GridSource<A>, mut criteria: SearchCriteria) -> Self {
        criteria.set_page_size(DEFAULT_PAGE_SIZE);
        criteria.set_current_page(1);
        Self {
            source,
            criteria,
            page: Vec::new().into_iter(),
            started: false,
            yielded: 0,
            finished: false,
        }
    }

    /// Use a different page size; has no effect once streaming started
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        if !self.started {
            self.criteria.set_page_size(page_size);
        }
        self
    }

    /// Next `(index, record)` pair, or `None` at the end of the stream
    pub async fn next(&mut self) -> Option<Result<(usize, A::Record), GridError>> {
        loop {
            if let Some(record) = self.page.next() {
                let index = self.yielded;
                self.yielded += 1;
                return Some(Ok((index, record)));
            }

            if self.finished {
                return None;
            }

            match self.load_next_page().await {
                Ok(true) => continue,
                Ok(false) => {
                    self.finish();
                    return None;
                }
                Err(e) => {
                    self.finish();
                    return Some(Err(e));
                }
            }
        }
    }

    /// Fetch the following page into the buffer; `false` means end of stream
    async fn load_next_page(&mut self) -> Result<bool, GridError> {
        if self.started {
            let total = self.source.total_count(&self.criteria).await?;
            if self.yielded >= total {
                tracing::debug!(rows = self.yielded, total, "row stream complete");
                return Ok(false);
            }
            let next_page = self.criteria.current_page() + 1;
            self.criteria.set_current_page(next_page);
        }
        self.started = true;

        let records = self.source.records(&self.criteria).await?;
        if records.is_empty() {
            let total = self.source.total_count(&self.criteria).await?;
            if self.yielded < total {
                tracing::warn!(
                    page = self.criteria.current_page(),
                    rows = self.yielded,
                    total,
                    "empty page before reported total, ending row stream"
                );
            }
            return Ok(false);
        }

        tracing::debug!(
            page = self.criteria.current_page(),
            records = records.len(),
            "loaded page"
        );
        self.page = records.into_iter();
        Ok(true)
    }

    fn finish(&mut self) {
        self.finished = true;
        self.page = Vec::new().into_iter();
        self.source.clear_cache();
    }

    /// Number of rows handed out so far
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Criteria in its current paging state
    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    /// The grid source being streamed
    pub fn source(&self) -> &GridSource<A> {
        &*self.source
    }
}

impl<A: SourceAdapter> Drop for RowStream<'_, A> {
    fn drop(&mut self) {
        self.source.clear_cache();
    }
}
