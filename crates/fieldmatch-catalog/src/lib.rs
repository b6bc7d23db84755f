#![deny(unsafe_code)]

pub mod csv;
pub mod error;
pub mod loaders;
pub mod profiles;

pub use crate::error::CatalogError;
pub use crate::loaders::{CATALOG_FILES, load_catalog_dir};
pub use crate::profiles::{ProfileSheet, load_profiles, parse_profiles};
