//! Missions and their targets.
//!
//! A mission is `Open` until it is marked complete; the transition is one-way
//! and targets can only be added while the mission is open. A target is
//! `Pending` until completed, and only pending targets may be deleted.

mod service;
mod store;

pub use service::MissionService;
pub use store::{MissionStore, SqliteMissionStore};

use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};

/// A mission with its targets, ordered by target id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: i64,
    pub cat_id: Option<i64>,
    pub name: String,
    pub is_complete: bool,
    #[serde(default)]
    pub targets: Vec<Target>,
}

impl Mission {
    pub fn is_assigned(&self) -> bool {
        self.cat_id.is_some()
    }
}

/// A mission target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: i64,
    pub mission_id: i64,
    pub name: String,
    pub country: String,
    pub notes: Option<String>,
    pub is_complete: bool,
}

/// Fields of a mission that is about to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMission {
    pub cat_id: Option<i64>,
    pub name: String,
    pub is_complete: bool,
}

/// Fields of a target that is about to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTarget {
    pub name: String,
    pub country: String,
    pub notes: Option<String>,
    pub is_complete: bool,
}

/// Request to create a mission together with its targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMissionRequest {
    #[serde(default)]
    pub cat_id: Option<i64>,
    pub name: String,
    pub targets: Vec<CreateTargetRequest>,
    #[serde(default)]
    pub is_complete: bool,
}

impl CreateMissionRequest {
    pub fn validate(&self) -> ServiceResult<()> {
        if self.name.trim().is_empty() {
            return Err(ServiceError::validation("mission name is required"));
        }
        if self.targets.is_empty() {
            return Err(ServiceError::validation(
                "mission must have at least one target",
            ));
        }
        self.targets.iter().try_for_each(CreateTargetRequest::validate)
    }

    pub fn into_parts(self) -> (NewMission, Vec<NewTarget>) {
        let mission = NewMission {
            cat_id: self.cat_id,
            name: self.name.trim().to_string(),
            is_complete: self.is_complete,
        };
        let targets = self
            .targets
            .into_iter()
            .map(CreateTargetRequest::into_new_target)
            .collect();
        (mission, targets)
    }
}

/// Request to add a target, either inline in a new mission or to an
/// existing one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTargetRequest {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_complete: bool,
}

impl CreateTargetRequest {
    pub fn validate(&self) -> ServiceResult<()> {
        if self.name.trim().is_empty() {
            return Err(ServiceError::validation("target name is required"));
        }
        if self.country.trim().is_empty() {
            return Err(ServiceError::validation("target country is required"));
        }
        Ok(())
    }

    pub fn into_new_target(self) -> NewTarget {
        NewTarget {
            name: self.name.trim().to_string(),
            country: self.country.trim().to_string(),
            notes: self.notes,
            is_complete: self.is_complete,
        }
    }
}

/// Partial target update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTargetRequest {
    #[serde(default)]
    pub is_complete: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request to assign a cat to a mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignCatRequest {
    pub cat_id: i64,
}
