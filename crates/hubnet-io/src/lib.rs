//! # hubnet-io: instance documents on disk
//!
//! Reads instance documents from `.json`, `.yaml` or `.yml` files and writes
//! reports as JSON.
//!
//! ```rust,no_run
//! use hubnet_io::load_instance;
//!
//! fn main() -> anyhow::Result<()> {
//!     let instance = load_instance("data/lima_instance.json")?;
//!     println!("{} clients", instance.clients().len());
//!     Ok(())
//! }
//! ```

pub mod loader;
pub mod writer;

pub use loader::{
    diagnose_instance, load_document, load_instance, parse_document, DocumentFormat,
    LoadedDocument,
};
pub use writer::{report_to_json, write_json};
