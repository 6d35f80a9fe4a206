//! Mission rules.

use std::sync::Arc;

use super::{Mission, MissionStore, NewMission, NewTarget, Target, UpdateTargetRequest};
use crate::cats::CatStore;
use crate::error::{ErrorKind, ServiceError, ServiceResult};

const MISSION_NOT_FOUND: &str = "mission not found";
const TARGET_NOT_FOUND: &str = "target not found";

#[derive(Clone)]
pub struct MissionService {
    store: Arc<dyn MissionStore>,
    cats: Arc<dyn CatStore>,
}

impl MissionService {
    pub fn new(store: Arc<dyn MissionStore>, cats: Arc<dyn CatStore>) -> Self {
        Self { store, cats }
    }

    /// Create a mission with its targets in one transaction and return it
    /// as stored.
    pub async fn create(&self, mission: NewMission, targets: Vec<NewTarget>) -> ServiceResult<Mission> {
        if let Some(cat_id) = mission.cat_id {
            self.ensure_cat_exists(cat_id).await?;
        }

        let id = self.store.create_with_targets(mission, targets).await?;
        tracing::info!("Created mission {}", id);

        self.store.get(id).await?.ok_or_else(|| {
            ServiceError::new(
                ErrorKind::Store,
                format!("mission {} missing after create", id),
            )
        })
    }

    pub async fn list(&self) -> ServiceResult<Vec<Mission>> {
        Ok(self.store.list().await?)
    }

    /// `Ok(None)` when no mission has this id.
    pub async fn get(&self, id: i64) -> ServiceResult<Option<Mission>> {
        Ok(self.store.get(id).await?)
    }

    /// Mark a mission complete. Completing an already complete mission is a
    /// no-op.
    pub async fn mark_complete(&self, id: i64) -> ServiceResult<()> {
        if self.store.mark_complete(id).await? == 0 {
            return Err(ServiceError::not_found(MISSION_NOT_FOUND));
        }
        tracing::info!("Mission {} marked complete", id);
        Ok(())
    }

    pub async fn assign_cat(&self, mission_id: i64, cat_id: i64) -> ServiceResult<()> {
        self.require_mission(mission_id).await?;
        self.ensure_cat_exists(cat_id).await?;

        if self.store.assign_cat(mission_id, cat_id).await? == 0 {
            return Err(ServiceError::not_found(MISSION_NOT_FOUND));
        }
        tracing::info!("Assigned cat {} to mission {}", cat_id, mission_id);
        Ok(())
    }

    /// Delete an unassigned mission together with its targets.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let mission = self.require_mission(id).await?;
        if mission.is_assigned() {
            return Err(assigned_conflict());
        }

        // A cat may have been assigned since the read above.
        if self.store.delete_unassigned(id).await? == 0 {
            return Err(assigned_conflict());
        }
        tracing::info!("Deleted mission {}", id);
        Ok(())
    }

    /// Add a target to an open mission; returns the new target id.
    pub async fn add_target(&self, mission_id: i64, target: NewTarget) -> ServiceResult<i64> {
        let mission = self.require_mission(mission_id).await?;
        if mission.is_complete {
            tracing::debug!("Refused target for completed mission {}", mission_id);
            return Err(ServiceError::new(
                ErrorKind::AssignmentAlreadyComplete,
                "cannot add target to completed mission",
            ));
        }

        let id = self.store.insert_target(mission_id, target).await?;
        tracing::info!("Added target {} to mission {}", id, mission_id);
        Ok(id)
    }

    /// `Ok(None)` when no target has this id.
    pub async fn get_target(&self, id: i64) -> ServiceResult<Option<Target>> {
        Ok(self.store.get_target(id).await?)
    }

    /// Apply a partial update to a target.
    pub async fn update_target(&self, id: i64, update: UpdateTargetRequest) -> ServiceResult<()> {
        let target = self.require_target(id).await?;
        if target.is_complete && update.is_complete == Some(false) {
            return Err(ServiceError::business_rule("cannot reopen completed target"));
        }

        if self
            .store
            .update_target(id, update.notes, update.is_complete)
            .await?
            == 0
        {
            return Err(ServiceError::not_found(TARGET_NOT_FOUND));
        }
        Ok(())
    }

    /// Delete a pending target.
    pub async fn delete_target(&self, id: i64) -> ServiceResult<()> {
        let target = self.require_target(id).await?;
        if target.is_complete {
            return Err(completed_target());
        }

        // Zero rows here means the target was completed or removed
        // concurrently.
        if self.store.delete_pending_target(id).await? == 0 {
            return Err(completed_target());
        }
        tracing::info!("Deleted target {}", id);
        Ok(())
    }

    async fn require_mission(&self, id: i64) -> ServiceResult<Mission> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(MISSION_NOT_FOUND))
    }

    async fn require_target(&self, id: i64) -> ServiceResult<Target> {
        self.store
            .get_target(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(TARGET_NOT_FOUND))
    }

    async fn ensure_cat_exists(&self, cat_id: i64) -> ServiceResult<()> {
        match self.cats.get(cat_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::business_rule(format!(
                "cannot assign unknown cat {}",
                cat_id
            ))),
        }
    }
}

fn assigned_conflict() -> ServiceError {
    ServiceError::conflict("cannot delete mission assigned to a cat")
}

fn completed_target() -> ServiceError {
    ServiceError::new(
        ErrorKind::CannotDeleteCompleted,
        "cannot delete completed target",
    )
}
