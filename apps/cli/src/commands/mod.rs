pub mod import_countries;
pub mod migrate;
pub mod search;
pub mod seed;
