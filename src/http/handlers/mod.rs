//! HTTP API handlers organized by resource.

pub mod folders;
pub mod generate;
pub mod images;
pub mod system;
pub mod uploads;

// Re-export all handlers for use in routing
pub(crate) use folders::{folder_create, folder_delete, folder_list, folder_rename};
pub(crate) use generate::{edit, generate};
pub(crate) use images::{image_delete, image_list, images_move};
pub(crate) use system::{health, metrics, presets};
pub(crate) use uploads::upload_get;
