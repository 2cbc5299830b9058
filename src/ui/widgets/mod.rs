pub mod bookmarks;
pub mod footer;
pub mod header;
pub mod popups;
