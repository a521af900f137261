pub mod backends;

pub use backends::{MemoryStore, SqliteStore};

pub mod prelude {
    pub use super::backends::{MemoryStore, SqliteStore};
    pub use vn_core::{PostStore, Result};
}
