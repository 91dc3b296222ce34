//! Loading, cutting, repairing and joining survey measurement catalogs.

pub mod catalog;
pub mod config;
pub mod error;
pub mod source;
pub mod table;

pub use catalog::{
    BAL_ID, Catalog, CutPolicy, DetectionCatalog, DuplicateReport, GoldCatalog, GoldSelector,
    GoldVariant, JoinedCatalog, ShapeCatalog, ShapeSelector, flux_to_magnitude,
};
pub use config::JoinOptions;
pub use error::{CatalogError, Result};
pub use table::{Mask, Table};
