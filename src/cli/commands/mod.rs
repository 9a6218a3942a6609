pub mod catalogs;
pub mod pull;
pub mod push;
