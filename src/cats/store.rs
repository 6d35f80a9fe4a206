//! Cat persistence.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};

use super::{Cat, NewCat};
use crate::db::{Database, StoreResult};

/// Cat store trait - implemented by storage backends.
#[async_trait]
pub trait CatStore: Send + Sync {
    /// Insert a cat and return its new id.
    async fn create(&self, cat: NewCat) -> StoreResult<i64>;

    /// All cats, ordered by id.
    async fn list(&self) -> StoreResult<Vec<Cat>>;

    async fn get(&self, id: i64) -> StoreResult<Option<Cat>>;

    /// Set the salary; returns the number of rows affected.
    async fn update_salary(&self, id: i64, salary: f64) -> StoreResult<usize>;

    /// Delete by id; returns the number of rows affected.
    async fn delete(&self, id: i64) -> StoreResult<usize>;
}

pub struct SqliteCatStore {
    db: Database,
}

impl SqliteCatStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn cat_from_row(row: &Row<'_>) -> rusqlite::Result<Cat> {
    Ok(Cat {
        id: row.get(0)?,
        name: row.get(1)?,
        years_of_experience: row.get(2)?,
        breed: row.get(3)?,
        salary: row.get(4)?,
    })
}

#[async_trait]
impl CatStore for SqliteCatStore {
    async fn create(&self, cat: NewCat) -> StoreResult<i64> {
        self.db
            .run(move |conn| {
                conn.execute(
                    "INSERT INTO cats (name, years_of_experience, breed, salary)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![cat.name, cat.years_of_experience, cat.breed, cat.salary],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
    }

    async fn list(&self) -> StoreResult<Vec<Cat>> {
        self.db
            .run(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, name, years_of_experience, breed, salary FROM cats ORDER BY id",
                )?;
                let cats = stmt
                    .query_map([], cat_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(cats)
            })
            .await
    }

    async fn get(&self, id: i64) -> StoreResult<Option<Cat>> {
        self.db
            .run(move |conn| {
                let cat = conn
                    .query_row(
                        "SELECT id, name, years_of_experience, breed, salary FROM cats WHERE id = ?1",
                        params![id],
                        cat_from_row,
                    )
                    .optional()?;
                Ok(cat)
            })
            .await
    }

    async fn update_salary(&self, id: i64, salary: f64) -> StoreResult<usize> {
        self.db
            .run(move |conn| {
                Ok(conn.execute(
                    "UPDATE cats SET salary = ?1 WHERE id = ?2",
                    params![salary, id],
                )?)
            })
            .await
    }

    async fn delete(&self, id: i64) -> StoreResult<usize> {
        self.db
            .run(move |conn| Ok(conn.execute("DELETE FROM cats WHERE id = ?1", params![id])?))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_cat(name: &str) -> NewCat {
        NewCat {
            name: name.to_string(),
            years_of_experience: 3,
            breed: "Persian".to_string(),
            salary: 800.0,
        }
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let store = SqliteCatStore::new(Database::open_in_memory().unwrap());

        let first = store.create(new_cat("Mittens")).await.unwrap();
        assert_eq!(store.delete(first).await.unwrap(), 1);
        let second = store.create(new_cat("Tom")).await.unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let store = SqliteCatStore::new(Database::open_in_memory().unwrap());
        let a = store.create(new_cat("Alpha")).await.unwrap();
        let b = store.create(new_cat("Bravo")).await.unwrap();

        let cats = store.list().await.unwrap();
        let ids: Vec<i64> = cats.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(cats[0].name, "Alpha");
    }

    #[tokio::test]
    async fn missing_rows_report_zero_affected() {
        let store = SqliteCatStore::new(Database::open_in_memory().unwrap());
        assert_eq!(store.update_salary(99, 10.0).await.unwrap(), 0);
        assert_eq!(store.delete(99).await.unwrap(), 0);
        assert!(store.get(99).await.unwrap().is_none());
    }
}
