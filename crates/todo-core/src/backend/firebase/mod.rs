//! Firebase Backend
//!
//! Identity Toolkit (auth) and Cloud Firestore (documents) over their REST
//! APIs. The two halves share the signed-in session through [`TokenHandle`].

mod auth;
mod firestore;
mod wire;

pub use auth::{AuthSession, FirebaseAuth, TokenHandle};
pub use firestore::FirestoreStore;
