pub mod domain;
pub mod dto;
pub mod error;
pub mod fields;
pub mod rules;

pub use domain::*;
pub use dto::*;
pub use error::CoreError;
pub use fields::{
    map_fields, parse_timestamp, slugify, CanonicalField, CanonicalRecord, DraftConversion,
    RawRecord,
};
pub use rules::*;
