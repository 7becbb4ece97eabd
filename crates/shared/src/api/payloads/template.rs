use serde::{Deserialize, Serialize};

use super::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use crate::{
    api::error::ValidationError,
    model::{
        constants::{TEMPLATE_MIN_DURATION_DAYS, TEMPLATE_TITLE_MIN_LENGTH},
        DietDay, TemplateRun, ValidateModel, WorkoutDay,
    },
    types::Uuid,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWorkoutTemplateRequest {
    pub title: String,
    pub description: Option<String>,
    pub duration_days: u32,
    pub goal: String,
    pub equipment: bool,
    pub body_type: Option<String>,
    pub days: Vec<WorkoutDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDietTemplateRequest {
    pub title: String,
    pub description: Option<String>,
    pub duration_days: u32,
    pub goal: String,
    pub equipment: bool,
    pub body_type: Option<String>,
    pub days: Vec<DietDay>,
}

/// Partial update, absent fields keep their stored values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateWorkoutTemplateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_days: Option<u32>,
    pub goal: Option<String>,
    pub equipment: Option<bool>,
    pub body_type: Option<String>,
    pub days: Option<Vec<WorkoutDay>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateDietTemplateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_days: Option<u32>,
    pub goal: Option<String>,
    pub equipment: Option<bool>,
    pub body_type: Option<String>,
    pub days: Option<Vec<DietDay>>,
}

fn validate_template_fields(
    title: Option<&str>,
    duration_days: Option<u32>,
) -> Result<(), ValidationError> {
    let mut error_messages = Vec::new();

    if let Some(title) = title {
        if title.trim().len() < TEMPLATE_TITLE_MIN_LENGTH {
            error_messages.push(format!(
                "Title needs to be at least {TEMPLATE_TITLE_MIN_LENGTH} character long"
            ));
        }
    }
    if let Some(duration_days) = duration_days {
        if duration_days < TEMPLATE_MIN_DURATION_DAYS {
            error_messages.push(format!(
                "Duration needs to be at least {TEMPLATE_MIN_DURATION_DAYS} day"
            ));
        }
    }

    if error_messages.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { error_messages })
    }
}

impl ValidateModel for CreateWorkoutTemplateRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_template_fields(Some(&self.title), Some(self.duration_days))
    }
}

impl ValidateModel for CreateDietTemplateRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_template_fields(Some(&self.title), Some(self.duration_days))
    }
}

impl ValidateModel for UpdateWorkoutTemplateRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_template_fields(self.title.as_deref(), self.duration_days)
    }
}

impl ValidateModel for UpdateDietTemplateRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_template_fields(self.title.as_deref(), self.duration_days)
    }
}

/// Query string for the template listings. `page` starts at 1
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub goal: Option<String>,
    pub equipment: Option<bool>,
    pub body_type: Option<String>,
}

impl TemplateListQuery {
    /// Resolves page/limit, rejecting out of range values before they
    /// reach the query builder
    pub fn page_and_limit(&self) -> Result<(u64, u64), ValidationError> {
        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT);

        let mut error_messages = Vec::new();
        if page < 1 {
            error_messages.push("page starts at 1".to_string());
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            error_messages.push(format!("limit must be between 1 and {MAX_PAGE_LIMIT}"));
        }

        if error_messages.is_empty() {
            Ok((page, limit))
        } else {
            Err(ValidationError { error_messages })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartTemplateRequest {
    pub template_id: Uuid,
}

/// An active run joined with the template it refers to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveTemplate<T> {
    pub run: TemplateRun,
    pub template: T,
}

#[cfg(test)]
mod tests {
    use super::TemplateListQuery;

    #[test]
    fn defaults_apply_when_unset() {
        let query = TemplateListQuery::default();
        assert_eq!(query.page_and_limit(), Ok((1, 20)));
    }

    #[test]
    fn out_of_range_page_and_limit_are_rejected() {
        let query = TemplateListQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(query.page_and_limit().is_err());

        let query = TemplateListQuery {
            limit: Some(0),
            ..Default::default()
        };
        assert!(query.page_and_limit().is_err());

        let query = TemplateListQuery {
            limit: Some(101),
            ..Default::default()
        };
        assert!(query.page_and_limit().is_err());

        let query = TemplateListQuery {
            page: Some(3),
            limit: Some(100),
            ..Default::default()
        };
        assert_eq!(query.page_and_limit(), Ok((3, 100)));
    }
}
