use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::TaskStatus;

    #[test]
    fn task_status_round_trips_through_slug() {
        assert_eq!(TaskStatus::InProgress.to_string(), "in_progress");
        assert_eq!(
            TaskStatus::from_str("in_progress").unwrap(),
            TaskStatus::InProgress
        );
        assert!(TaskStatus::from_str("archived").is_err());
    }

    #[test]
    fn task_status_defaults_to_pending() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
    }
}
