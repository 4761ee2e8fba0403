use serde::Serialize;

pub const MAX_PAGE_SIZE: u32 = 100;

/// A 1-based page window. Out-of-range inputs are clamped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: Option<i32>, limit: Option<i32>, default_limit: u32) -> Self {
        let page = page.filter(|p| *p >= 1).map_or(1, |p| p as u32);
        let limit = limit
            .map_or(default_limit, |l| l.clamp(1, MAX_PAGE_SIZE as i32) as u32);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub request: PageRequest,
    pub total: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            items,
            request,
            total,
        }
    }

    pub fn pagination(&self) -> Pagination {
        let limit = i64::from(self.request.limit);
        Pagination {
            page: self.request.page,
            limit: self.request.limit,
            total: self.total,
            pages: (self.total + limit - 1) / limit,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub pages: i64,
}
