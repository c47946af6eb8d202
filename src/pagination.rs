//! This modules defines the common functionality for paging data.

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum transactions to display per page when not specified in a request.
    pub default_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_pages: 5,
        }
    }
}

/// A validated request for one page of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// The 1-based page number.
    pub page: u64,
    /// The maximum number of records on a page.
    pub page_size: u64,
}

impl PageRequest {
    /// Create a page request.
    ///
    /// # Errors
    /// Returns [Error::InvalidPagination] if `page` or `page_size` is zero.
    pub fn new(page: u64, page_size: u64) -> Result<Self, Error> {
        if page == 0 {
            return Err(Error::InvalidPagination(
                "page numbers start at 1".to_owned(),
            ));
        }

        if page_size == 0 {
            return Err(Error::InvalidPagination(
                "page size must be at least 1".to_owned(),
            ));
        }

        Ok(Self { page, page_size })
    }

    /// Fill in a missing page or page size from the configured defaults.
    ///
    /// # Errors
    /// Returns [Error::InvalidPagination] if the page or page size is zero.
    pub fn with_defaults(
        page: Option<u64>,
        page_size: Option<u64>,
        config: &PaginationConfig,
    ) -> Result<Self, Error> {
        Self::new(
            page.unwrap_or(config.default_page),
            page_size.unwrap_or(config.default_page_size),
        )
    }

    /// The number of records before this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// The number of pages needed to show `total` records, `page_size` at a time.
pub fn page_count(total: u64, page_size: u64) -> u64 {
    total.div_ceil(page_size.max(1))
}

/// One element of the pagination control under a table.
#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

/// Lay out the page links for `curr_page`, showing at most `max_pages`
/// numbered pages plus the first and last page.
pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    let mut indicators: Vec<PaginationIndicator> = if page_count <= max_pages {
        (1..=page_count).map(map_page).collect()
    } else if curr_page <= (max_pages / 2) {
        (1..=max_pages).map(map_page).collect()
    } else if curr_page > (page_count - max_pages / 2) {
        ((page_count - max_pages + 1)..=page_count)
            .map(map_page)
            .collect()
    } else {
        ((curr_page - max_pages / 2)..=(curr_page + max_pages / 2))
            .map(map_page)
            .collect()
    };

    if page_count > max_pages {
        if curr_page > (max_pages / 2) + 1 {
            indicators.insert(0, PaginationIndicator::Page(1));
            indicators.insert(1, PaginationIndicator::Ellipsis);
        }

        if curr_page < (page_count - max_pages / 2) {
            indicators.push(PaginationIndicator::Ellipsis);
            indicators.push(PaginationIndicator::Page(page_count));
        }
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}
