use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: u64 = 20;
pub const MAX_PAGE_LIMIT: u64 = 100;

/// One page of a filtered listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        Self {
            items,
            total,
            page,
            total_pages: total.div_ceil(limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Page;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(Page::<()>::new(vec![], 0, 1, 20).total_pages, 0);
        assert_eq!(Page::<()>::new(vec![], 1, 1, 20).total_pages, 1);
        assert_eq!(Page::<()>::new(vec![], 20, 1, 20).total_pages, 1);
        assert_eq!(Page::<()>::new(vec![], 21, 1, 20).total_pages, 2);
    }
}
