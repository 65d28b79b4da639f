//! Backend Layer
//!
//! Abstract identity provider and document store, plus the two
//! implementations: Firebase over REST and an in-memory stand-in.

mod traits;
mod memory;
pub mod firebase;

pub use traits::{AuthListener, DocumentStore, FederatedCredential, IdentityProvider};
pub use memory::{MemoryIdentityProvider, MemoryStore};
