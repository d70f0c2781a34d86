pub mod coordinator;
pub mod page;

pub use coordinator::SearchCoordinator;
pub use page::{SearchEvent, SearchPage};
