mod backend;
pub mod nominatim;

pub use backend::Backend;
