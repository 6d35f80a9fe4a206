//! Spy cats: the agents that missions are assigned to.

mod service;
mod store;

pub use service::CatService;
pub use store::{CatStore, SqliteCatStore};

use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};

pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 50;
pub const MAX_YEARS_OF_EXPERIENCE: i64 = 50;

/// A spy cat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cat {
    pub id: i64,
    pub name: String,
    pub years_of_experience: i64,
    pub breed: String,
    pub salary: f64,
}

/// Fields of a cat that is about to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCat {
    pub name: String,
    pub years_of_experience: i64,
    pub breed: String,
    pub salary: f64,
}

/// Request to hire a new cat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCatRequest {
    pub name: String,
    pub years_of_experience: i64,
    pub breed: String,
    pub salary: f64,
}

impl CreateCatRequest {
    /// Check field ranges. The breed is only checked for presence here; the
    /// registry lookup happens in [`CatService::create`].
    pub fn validate(&self) -> ServiceResult<()> {
        let name_len = self.name.trim().chars().count();
        if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&name_len) {
            return Err(ServiceError::validation(format!(
                "name must be between {} and {} characters",
                MIN_NAME_LEN, MAX_NAME_LEN
            )));
        }
        if !(0..=MAX_YEARS_OF_EXPERIENCE).contains(&self.years_of_experience) {
            return Err(ServiceError::validation(format!(
                "years_of_experience must be between 0 and {}",
                MAX_YEARS_OF_EXPERIENCE
            )));
        }
        if self.breed.trim().is_empty() {
            return Err(ServiceError::validation("breed is required"));
        }
        validate_salary(self.salary)
    }

    pub fn into_new_cat(self) -> NewCat {
        NewCat {
            name: self.name.trim().to_string(),
            years_of_experience: self.years_of_experience,
            breed: self.breed,
            salary: self.salary,
        }
    }
}

/// Request to change a cat's salary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSalaryRequest {
    pub salary: f64,
}

impl UpdateSalaryRequest {
    pub fn validate(&self) -> ServiceResult<()> {
        validate_salary(self.salary)
    }
}

fn validate_salary(salary: f64) -> ServiceResult<()> {
    if !salary.is_finite() || salary < 0.0 {
        return Err(ServiceError::validation("salary must be a non-negative number"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn request() -> CreateCatRequest {
        CreateCatRequest {
            name: "Whiskers".to_string(),
            years_of_experience: 5,
            breed: "Siamese".to_string(),
            salary: 1000.0,
        }
    }

    #[test]
    fn accepts_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn rejects_short_and_long_names() {
        let mut req = request();
        req.name = "W".to_string();
        assert_eq!(req.validate().unwrap_err().kind, ErrorKind::Validation);

        req.name = "x".repeat(51);
        assert_eq!(req.validate().unwrap_err().kind, ErrorKind::Validation);

        req.name = "x".repeat(50);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn experience_bounds_are_inclusive() {
        let mut req = request();
        req.years_of_experience = 0;
        assert!(req.validate().is_ok());
        req.years_of_experience = 50;
        assert!(req.validate().is_ok());
        req.years_of_experience = 51;
        assert!(req.validate().is_err());
        req.years_of_experience = -1;
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_blank_breed() {
        let mut req = request();
        req.breed = "  ".to_string();
        let err = req.validate().unwrap_err();
        assert_eq!(err.message, "breed is required");
    }

    #[test]
    fn salary_must_be_non_negative() {
        assert!(UpdateSalaryRequest { salary: 0.0 }.validate().is_ok());
        assert!(UpdateSalaryRequest { salary: -0.5 }.validate().is_err());
        assert!(UpdateSalaryRequest { salary: f64::NAN }.validate().is_err());
    }
}
