use serde::{Deserialize, Serialize};

use crate::error::ShapeError;
use crate::filter::Predicate;
use crate::projection::Projection;
use crate::sort::Sort;

/// The `(skip, limit)` slice of matched documents, with the page it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
    pub skip: u64,
}

impl PageWindow {
    pub fn new(page: u64, limit: u64) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        Self {
            page,
            limit,
            skip: (page - 1).saturating_mul(limit),
        }
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        PageWindow::new(1, 100)
    }
}

/// Parsed `page`/`limit` before the matching count is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub window: PageWindow,
    /// `page` was supplied by the caller rather than defaulted.
    pub explicit: bool,
}

impl PageRequest {
    /// Check the window against the number of matching documents.
    ///
    /// Only an explicit page can overflow; a defaulted first page is always
    /// valid, even on an empty collection.
    pub fn bound(self, total: u64) -> Result<PageWindow, ShapeError> {
        if self.explicit && self.window.skip >= total {
            return Err(ShapeError::InvalidPage {
                page: self.window.page,
                skip: self.window.skip,
                total,
            });
        }
        Ok(self.window)
    }
}

/// A fully shaped query, ready for the persistence layer.
///
/// Built fresh per request; each `with_*` stage returns a new descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    pub filter: Predicate,
    pub sort: Vec<Sort>,
    pub projection: Projection,
    pub window: PageWindow,
}

impl QueryDescriptor {
    pub fn with_filter(self, filter: Predicate) -> Self {
        Self { filter, ..self }
    }

    pub fn with_sort(self, sort: Vec<Sort>) -> Self {
        Self { sort, ..self }
    }

    pub fn with_projection(self, projection: Projection) -> Self {
        Self { projection, ..self }
    }

    pub fn with_window(self, window: PageWindow) -> Self {
        Self { window, ..self }
    }
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self {
            filter: Predicate::new(),
            sort: vec![Sort::desc("createdAt"), Sort::asc("_id")],
            projection: Projection::All,
            window: PageWindow::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_computes_skip() {
        let w = PageWindow::new(3, 10);
        assert_eq!(w.skip, 20);
        assert_eq!(PageWindow::default(), PageWindow { page: 1, limit: 100, skip: 0 });
    }

    #[test]
    fn window_clamps_to_one() {
        let w = PageWindow::new(0, 0);
        assert_eq!(w, PageWindow { page: 1, limit: 1, skip: 0 });
    }

    #[test]
    fn window_skip_saturates() {
        let w = PageWindow::new(u64::MAX, u64::MAX);
        assert_eq!(w.skip, u64::MAX);
    }

    #[test]
    fn implicit_page_never_overflows() {
        let req = PageRequest {
            window: PageWindow::default(),
            explicit: false,
        };
        assert_eq!(req.bound(0), Ok(PageWindow::default()));
    }

    #[test]
    fn explicit_page_past_the_end_is_rejected() {
        let req = PageRequest {
            window: PageWindow::new(2, 5),
            explicit: true,
        };
        assert_eq!(req.bound(6), Ok(PageWindow::new(2, 5)));
        assert_eq!(
            req.bound(5),
            Err(ShapeError::InvalidPage { page: 2, skip: 5, total: 5 })
        );
    }

    #[test]
    fn stages_replace_one_part_each() {
        let d = QueryDescriptor::default().with_window(PageWindow::new(2, 10));
        assert_eq!(d.window.skip, 10);
        assert_eq!(d.sort, QueryDescriptor::default().sort);
        assert!(d.projection.is_all());
    }
}
