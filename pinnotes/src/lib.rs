pub mod author_address;
pub mod bin_constants;
pub mod config;
pub mod content_store;
pub mod data;
pub mod json_object;
pub mod logging;
pub mod note_repository;
pub mod util;
mod lib_constants;
