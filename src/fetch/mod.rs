pub mod links;
pub mod page;

pub use links::{discover_detail_links, force_all_machine_types};
pub use page::{HttpPageSource, PageSource};
