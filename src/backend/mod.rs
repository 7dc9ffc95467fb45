pub mod error;
pub mod memory;
pub mod supabase;
pub mod traits;
pub mod types;

pub use error::BackendError;
pub use memory::InMemoryBackend;
pub use supabase::SupabaseClient;
pub use traits::{BackendClient, BackendResult, StorageClient};
pub use types::{object_path, Bucket, Order, SelectQuery};
