//! Domain Layer
//!
//! Core entities shared by the session, the list controller and the backends.

mod error;
mod identity;
mod item;

pub use error::{AuthError, AuthResult, StoreError, StoreResult};
pub use identity::{Identity, UserId};
pub use item::{Item, ItemId, ItemPatch, NewItem};
