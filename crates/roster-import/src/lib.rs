pub mod batch;
pub mod error;
pub mod json;
pub mod legacy;
pub mod manual;
pub mod vcard;

pub use batch::{ImportReport, ParsedImport};
pub use error::{ImportError, Result};
