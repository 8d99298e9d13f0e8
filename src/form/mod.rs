//! Form state, field registry, and the interfaces to the rendered form

pub mod currency;
pub mod fields;
pub mod loader;
pub mod resolver;
pub mod state;
pub mod store;

pub use currency::{format_currency, format_dollars, parse_currency, round_to_nearest};
pub use fields::{classify_export_key, kind_of, FieldKind};
pub use loader::{load_applicants, load_default_applicants};
pub use resolver::{capture_inputs, populate_fields, publish_calculated, FieldResolver, MemoryResolver};
pub use state::{FieldValue, FormState};
pub use store::{JsonFileStore, MemoryStore, StateStore, DEFAULT_SESSION_KEY};
