pub mod classify;
pub mod diff;
pub mod document;
pub mod entry_point;
pub mod links;
pub mod naming;
pub mod serialize;
pub mod walker;

pub use classify::{classify, PathKind};
pub use diff::{preview_page, unified_diff};
pub use document::{transform_file, transform_markup};
pub use entry_point::{render_entry_point, PageRoute};
pub use links::{rewrite_background_urls, rewrite_links};
pub use naming::sanitize_identifier;
pub use walker::{collect_pages, convert_tree, ConversionReport};
