pub mod backend;
pub mod error;
mod key;

pub use crate::backend::SlotBackend;
pub use crate::key::validate as validate_key;
use std::sync::Arc;

pub type BackendHandle = Arc<dyn SlotBackend>;
