pub mod pagination;
pub mod shutdown;

pub use pagination::{Page, PageLimits, PageRequest, PaginationMeta};
pub use shutdown::{listen_for_shutdown_signals, ShutdownCoordinator, ShutdownSignal};
