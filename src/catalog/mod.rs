//! Catalog data model.
//!
//! A catalog is a named local collection of [`CatalogItem`]s sharing one
//! context tag (e.g. "characters"). The [`CatalogRegistry`] maps context
//! tags to catalog handles; the sync engine consumes catalogs only through
//! the [`Catalog`] trait.

#[allow(clippy::module_inception)]
mod catalog;
mod file_catalog;
mod item;
mod registry;

pub use catalog::{Catalog, CatalogError, MemoryCatalog, Result};
pub use file_catalog::FileCatalog;
pub use item::CatalogItem;
pub use registry::CatalogRegistry;
