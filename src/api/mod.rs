/// External API clients
///
/// This module handles:
/// - Querying the eBird API for nearby observations (ebird.rs)
/// - Looking up species thumbnails on Wikipedia (wikipedia.rs)
/// - The shared error taxonomy for both clients (error.rs)

pub mod ebird;
pub mod error;
pub mod wikipedia;
