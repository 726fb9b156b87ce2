pub mod supabase;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod memory;

pub use supabase::SupabaseClient;
pub use traits::{FileStore, IdentityProvider, ListingStore};
pub use types::{AuthSession, AuthUser, PropertyQuery};
