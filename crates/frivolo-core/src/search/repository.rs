//! Search repository trait.

use async_trait::async_trait;

use super::model::{NewSearch, SearchRecord};
use crate::error::Result;
use crate::identity::Identity;

/// An abstract repository for saved searches.
///
/// Implementations insert what they are given; input checks happen when a
/// [`NewSearch`] is built.
#[async_trait]
pub trait SearchRepository: Send + Sync {
    /// Saves a search for `identity` and returns the stored record.
    async fn create_search(&self, identity: &Identity, search: &NewSearch)
    -> Result<SearchRecord>;

    /// Lists every search of `identity`, newest first.
    ///
    /// # Returns
    ///
    /// - `Ok(vec![])`: The user has no saved searches
    /// - `Err(_)`: The backend could not be reached or answered with an error.
    ///   This is never reported as an empty list.
    async fn list_searches(&self, identity: &Identity) -> Result<Vec<SearchRecord>>;

    /// Deletes one search by its backend identifier.
    ///
    /// Deleting an id that does not exist is left to the backend; most
    /// backends report success.
    async fn delete_search(&self, search_id: &str) -> Result<()>;
}
