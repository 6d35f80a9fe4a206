//! Cat rules: registry-gated hiring, salary changes, removal.

use std::sync::Arc;

use super::{Cat, CatStore, NewCat};
use crate::breeds::BreedRegistry;
use crate::error::{ErrorKind, ServiceError, ServiceResult};

#[derive(Clone)]
pub struct CatService {
    store: Arc<dyn CatStore>,
    breeds: Arc<dyn BreedRegistry>,
}

impl CatService {
    pub fn new(store: Arc<dyn CatStore>, breeds: Arc<dyn BreedRegistry>) -> Self {
        Self { store, breeds }
    }

    /// Store a new cat once its breed is confirmed by the registry.
    pub async fn create(&self, cat: NewCat) -> ServiceResult<i64> {
        let known = self.breeds.breed_exists(&cat.breed).await.map_err(|e| {
            tracing::warn!("Breed registry lookup failed: {}", e);
            ServiceError::new(
                ErrorKind::RegistryUnavailable,
                format!("failed to validate breed: {}", e),
            )
        })?;
        if !known {
            tracing::debug!("Rejected cat with unknown breed {:?}", cat.breed);
            return Err(ServiceError::new(
                ErrorKind::InvalidBreed,
                format!("invalid cat breed: {}", cat.breed),
            ));
        }

        let id = self.store.create(cat).await?;
        tracing::info!("Created cat {}", id);
        Ok(id)
    }

    pub async fn list(&self) -> ServiceResult<Vec<Cat>> {
        Ok(self.store.list().await?)
    }

    /// `Ok(None)` when no cat has this id.
    pub async fn get(&self, id: i64) -> ServiceResult<Option<Cat>> {
        Ok(self.store.get(id).await?)
    }

    pub async fn update_salary(&self, id: i64, salary: f64) -> ServiceResult<()> {
        let affected = self.store.update_salary(id, salary).await?;
        if affected == 0 {
            return Err(ServiceError::not_found(cat_not_found(id)));
        }
        Ok(())
    }

    /// Delete a cat. Deleting an unknown id is not an error; missions the
    /// cat was assigned to become unassigned.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let affected = self.store.delete(id).await?;
        if affected == 0 {
            tracing::debug!("Delete of cat {} matched no rows", id);
        }
        Ok(())
    }
}

pub(crate) fn cat_not_found(id: i64) -> String {
    format!("cat not found with id {}", id)
}
