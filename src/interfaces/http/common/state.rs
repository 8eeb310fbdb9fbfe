use crate::config::{DatasetConfig, PaginationConfig};
use crate::domain::DomainResult;
use crate::infrastructure::database::DatasetReader;
use crate::shared::PageRequest;

/// State shared by the dataset resource routers
#[derive(Clone)]
pub struct ResourceState {
    pub reader: DatasetReader,
    pub pagination: PaginationConfig,
    pub dataset: DatasetConfig,
}

impl ResourceState {
    /// Validate paging parameters for a top-level list
    pub fn list_page(&self, page: Option<u64>, page_size: Option<u64>) -> DomainResult<PageRequest> {
        PageRequest::new(page, page_size, self.pagination.list_limits())
    }

    /// Validate paging parameters for a per-player or per-venue match list
    pub fn nested_page(&self, page: Option<u64>, page_size: Option<u64>) -> DomainResult<PageRequest> {
        PageRequest::new(page, page_size, self.pagination.nested_limits())
    }
}
