//! Member directory data models
//!
//! Domain types shared by the search engine, the server and the CLI:
//! profiles, countries, user accounts and the enumeration tables
//! (positions, research methods, application domains, months) that
//! give stored codes their human-readable labels.

#![forbid(unsafe_code)]

pub mod country;
pub mod enumerations;
pub mod error;
pub mod profile;
pub mod user;

pub use country::Country;
pub use enumerations::{Enumerations, LabelEntry, LabelTable};
pub use error::{Error, FieldError, Result};
pub use profile::{Profile, ProfileDraft};
pub use user::User;
