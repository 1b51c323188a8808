//! Static layer configuration.
//!
//! The layer config is an author-curated JSON array describing which map
//! layers the viewer offers, how they are grouped, and which server backs
//! them. It is loaded once and never changes while the catalog runs.
//!
//! # Example
//!
//! ```ignore
//! use layercatalog::spec::load_layer_specs;
//!
//! let specs = load_layer_specs(Path::new("layers.json"))?;
//! println!("{} root layers", specs.len());
//! ```

mod layer;
mod loader;
mod server;

pub use layer::{LayerSpec, ReportSpec};
pub use loader::{load_layer_specs, parse_layer_specs};
pub use server::{LayerType, ServerSpec, ServerType};

pub(crate) use loader::read_json;
