use serde::{Deserialize, Serialize};

use super::request::PageRequest;

/// Page metadata returned alongside every page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub last_page: u64,
    pub current_page: u64,
    pub per_page: u64,
    pub prev: Option<u64>,
    pub next: Option<u64>,
}

impl PageMeta {
    pub fn new(total: u64, request: &PageRequest) -> Self {
        let per_page = request.limit();
        let current_page = request.page();
        let last_page = total.div_ceil(per_page);

        Self {
            total,
            last_page,
            current_page,
            per_page,
            prev: (current_page > 1).then(|| current_page - 1),
            next: (current_page < last_page).then(|| current_page + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> PageResult<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}
