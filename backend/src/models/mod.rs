pub mod conflict;
pub mod draft;
pub mod entities;
pub mod entry;
pub mod ids;
pub mod macros;
pub mod slot;

pub use conflict::*;
pub use draft::*;
pub use entities::*;
pub use entry::*;
pub use ids::*;
pub use slot::*;
