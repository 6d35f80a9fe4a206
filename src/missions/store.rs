//! Mission and target persistence.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;

use super::{Mission, NewMission, NewTarget, Target};
use crate::db::{Database, StoreResult};

/// Mission store trait - implemented by storage backends.
#[async_trait]
pub trait MissionStore: Send + Sync {
    /// Insert a mission and all of its targets atomically; returns the
    /// mission id. Nothing is written if any insert fails.
    async fn create_with_targets(
        &self,
        mission: NewMission,
        targets: Vec<NewTarget>,
    ) -> StoreResult<i64>;

    /// All missions with their targets, ordered by id.
    async fn list(&self) -> StoreResult<Vec<Mission>>;

    /// A mission with its targets.
    async fn get(&self, id: i64) -> StoreResult<Option<Mission>>;

    /// Set the completion flag; returns the number of rows affected.
    async fn mark_complete(&self, id: i64) -> StoreResult<usize>;

    /// Link a cat; returns the number of rows affected.
    async fn assign_cat(&self, mission_id: i64, cat_id: i64) -> StoreResult<usize>;

    /// Delete the mission (and its targets) only if no cat is assigned;
    /// returns the number of missions deleted.
    async fn delete_unassigned(&self, id: i64) -> StoreResult<usize>;

    async fn insert_target(&self, mission_id: i64, target: NewTarget) -> StoreResult<i64>;

    async fn get_target(&self, id: i64) -> StoreResult<Option<Target>>;

    /// Apply the present fields; returns the number of rows affected.
    async fn update_target(
        &self,
        id: i64,
        notes: Option<String>,
        is_complete: Option<bool>,
    ) -> StoreResult<usize>;

    /// Delete the target only while it is pending; returns the number of
    /// rows affected.
    async fn delete_pending_target(&self, id: i64) -> StoreResult<usize>;
}

pub struct SqliteMissionStore {
    db: Database,
}

impl SqliteMissionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

const MISSION_COLUMNS: &str = "id, cat_id, name, is_complete";
const TARGET_COLUMNS: &str = "id, mission_id, name, country, notes, is_complete";

fn mission_from_row(row: &Row<'_>) -> rusqlite::Result<Mission> {
    Ok(Mission {
        id: row.get(0)?,
        cat_id: row.get(1)?,
        name: row.get(2)?,
        is_complete: row.get(3)?,
        targets: Vec::new(),
    })
}

fn target_from_row(row: &Row<'_>) -> rusqlite::Result<Target> {
    Ok(Target {
        id: row.get(0)?,
        mission_id: row.get(1)?,
        name: row.get(2)?,
        country: row.get(3)?,
        notes: row.get(4)?,
        is_complete: row.get(5)?,
    })
}

fn insert_target(conn: &Connection, mission_id: i64, target: &NewTarget) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO targets (mission_id, name, country, notes, is_complete)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            mission_id,
            target.name,
            target.country,
            target.notes,
            target.is_complete
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn targets_of(conn: &Connection, mission_id: i64) -> rusqlite::Result<Vec<Target>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM targets WHERE mission_id = ?1 ORDER BY id",
        TARGET_COLUMNS
    ))?;
    let targets = stmt
        .query_map(params![mission_id], target_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(targets)
}

#[async_trait]
impl MissionStore for SqliteMissionStore {
    async fn create_with_targets(
        &self,
        mission: NewMission,
        targets: Vec<NewTarget>,
    ) -> StoreResult<i64> {
        self.db
            .run(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT INTO missions (cat_id, name, is_complete) VALUES (?1, ?2, ?3)",
                    params![mission.cat_id, mission.name, mission.is_complete],
                )?;
                let mission_id = tx.last_insert_rowid();
                for target in &targets {
                    insert_target(&tx, mission_id, target)?;
                }
                tx.commit()?;
                Ok(mission_id)
            })
            .await
    }

    async fn list(&self) -> StoreResult<Vec<Mission>> {
        self.db
            .run(|conn| {
                let mut missions = {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {} FROM missions ORDER BY id",
                        MISSION_COLUMNS
                    ))?;
                    let rows = stmt.query_map([], mission_from_row)?;
                    rows.collect::<Result<Vec<_>, _>>()?
                };

                let mut by_mission: HashMap<i64, Vec<Target>> = HashMap::new();
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM targets ORDER BY mission_id, id",
                    TARGET_COLUMNS
                ))?;
                for target in stmt.query_map([], target_from_row)? {
                    let target = target?;
                    by_mission.entry(target.mission_id).or_default().push(target);
                }

                for mission in &mut missions {
                    mission.targets = by_mission.remove(&mission.id).unwrap_or_default();
                }
                Ok(missions)
            })
            .await
    }

    async fn get(&self, id: i64) -> StoreResult<Option<Mission>> {
        self.db
            .run(move |conn| {
                let mission = conn
                    .query_row(
                        &format!("SELECT {} FROM missions WHERE id = ?1", MISSION_COLUMNS),
                        params![id],
                        mission_from_row,
                    )
                    .optional()?;

                match mission {
                    Some(mut m) => {
                        m.targets = targets_of(conn, id)?;
                        Ok(Some(m))
                    }
                    None => Ok(None),
                }
            })
            .await
    }

    async fn mark_complete(&self, id: i64) -> StoreResult<usize> {
        self.db
            .run(move |conn| {
                Ok(conn.execute(
                    "UPDATE missions SET is_complete = 1 WHERE id = ?1",
                    params![id],
                )?)
            })
            .await
    }

    async fn assign_cat(&self, mission_id: i64, cat_id: i64) -> StoreResult<usize> {
        self.db
            .run(move |conn| {
                Ok(conn.execute(
                    "UPDATE missions SET cat_id = ?1 WHERE id = ?2",
                    params![cat_id, mission_id],
                )?)
            })
            .await
    }

    async fn delete_unassigned(&self, id: i64) -> StoreResult<usize> {
        self.db
            .run(move |conn| {
                Ok(conn.execute(
                    "DELETE FROM missions WHERE id = ?1 AND cat_id IS NULL",
                    params![id],
                )?)
            })
            .await
    }

    async fn insert_target(&self, mission_id: i64, target: NewTarget) -> StoreResult<i64> {
        self.db
            .run(move |conn| Ok(insert_target(conn, mission_id, &target)?))
            .await
    }

    async fn get_target(&self, id: i64) -> StoreResult<Option<Target>> {
        self.db
            .run(move |conn| {
                let target = conn
                    .query_row(
                        &format!("SELECT {} FROM targets WHERE id = ?1", TARGET_COLUMNS),
                        params![id],
                        target_from_row,
                    )
                    .optional()?;
                Ok(target)
            })
            .await
    }

    async fn update_target(
        &self,
        id: i64,
        notes: Option<String>,
        is_complete: Option<bool>,
    ) -> StoreResult<usize> {
        self.db
            .run(move |conn| {
                Ok(conn.execute(
                    "UPDATE targets
                     SET notes = COALESCE(?1, notes), is_complete = COALESCE(?2, is_complete)
                     WHERE id = ?3",
                    params![notes, is_complete, id],
                )?)
            })
            .await
    }

    async fn delete_pending_target(&self, id: i64) -> StoreResult<usize> {
        self.db
            .run(move |conn| {
                Ok(conn.execute(
                    "DELETE FROM targets WHERE id = ?1 AND is_complete = 0",
                    params![id],
                )?)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteMissionStore {
        SqliteMissionStore::new(Database::open_in_memory().unwrap())
    }

    fn mission(name: &str) -> NewMission {
        NewMission {
            cat_id: None,
            name: name.to_string(),
            is_complete: false,
        }
    }

    fn target(name: &str) -> NewTarget {
        NewTarget {
            name: name.to_string(),
            country: "Russia".to_string(),
            notes: Some("High priority".to_string()),
            is_complete: false,
        }
    }

    #[tokio::test]
    async fn create_and_fetch_nested() {
        let store = store();
        let id = store
            .create_with_targets(mission("Operation Stealth"), vec![target("Alpha"), target("Beta")])
            .await
            .unwrap();

        let fetched = store.get(id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Operation Stealth");
        let names: Vec<&str> = fetched.targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
        assert!(fetched.targets.iter().all(|t| t.mission_id == id));
    }

    #[tokio::test]
    async fn failed_target_insert_rolls_back_mission() {
        let store = store();
        store
            .db
            .run(|conn| {
                conn.execute_batch(
                    "CREATE TRIGGER reject_boom BEFORE INSERT ON targets
                     WHEN NEW.name = 'Boom'
                     BEGIN SELECT RAISE(ABORT, 'boom'); END;",
                )?;
                Ok(())
            })
            .await
            .unwrap();

        assert!(store
            .create_with_targets(mission("Operation Ghost"), vec![target("Alpha"), target("Boom")])
            .await
            .is_err());
        assert!(store.list().await.unwrap().is_empty());

        let count: i64 = store
            .db
            .run(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM targets", [], |r| r.get(0))?))
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn dangling_cat_reference_is_rejected() {
        let store = store();
        let mut bad = mission("Operation Ghost");
        bad.cat_id = Some(404);

        assert!(store
            .create_with_targets(bad, vec![target("Alpha")])
            .await
            .is_err());
    }

    #[tokio::test]
    async fn list_groups_targets_by_mission() {
        let store = store();
        let first = store
            .create_with_targets(mission("First"), vec![target("A1")])
            .await
            .unwrap();
        let second = store
            .create_with_targets(mission("Second"), vec![target("B1"), target("B2")])
            .await
            .unwrap();
        store.insert_target(first, target("A2")).await.unwrap();

        let missions = store.list().await.unwrap();
        assert_eq!(missions.len(), 2);
        assert_eq!(missions[0].id, first);
        assert_eq!(missions[0].targets.len(), 2);
        assert_eq!(missions[1].id, second);
        assert_eq!(missions[1].targets.len(), 2);
    }

    #[tokio::test]
    async fn update_target_keeps_absent_fields() {
        let store = store();
        let id = store
            .create_with_targets(mission("M"), vec![target("Alpha")])
            .await
            .unwrap();
        let target_id = store.get(id).await.unwrap().unwrap().targets[0].id;

        assert_eq!(store.update_target(target_id, None, Some(true)).await.unwrap(), 1);
        let t = store.get_target(target_id).await.unwrap().unwrap();
        assert!(t.is_complete);
        assert_eq!(t.notes.as_deref(), Some("High priority"));

        store
            .update_target(target_id, Some("Done".to_string()), None)
            .await
            .unwrap();
        let t = store.get_target(target_id).await.unwrap().unwrap();
        assert!(t.is_complete);
        assert_eq!(t.notes.as_deref(), Some("Done"));
    }

    #[tokio::test]
    async fn conditional_deletes() {
        let store = store();
        let id = store
            .create_with_targets(mission("M"), vec![target("Alpha")])
            .await
            .unwrap();
        let target_id = store.get(id).await.unwrap().unwrap().targets[0].id;

        store.update_target(target_id, None, Some(true)).await.unwrap();
        assert_eq!(store.delete_pending_target(target_id).await.unwrap(), 0);

        assert_eq!(store.delete_unassigned(id).await.unwrap(), 1);
        assert!(store.get_target(target_id).await.unwrap().is_none());
    }
}
