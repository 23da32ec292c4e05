use std::ops::Deref;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// Core survey group data, as stored in the database.
///
/// A group is a named campaign; its surveys can only be completed while
/// today's date falls inside the group's availability window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyGroupCore {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Where a given day falls relative to a group's availability window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    NotStarted,
    Open,
    Ended,
}

impl SurveyGroupCore {
    /// Classify the given day against this group's window.
    /// Both endpoints are inclusive.
    pub fn window_state(&self, today: NaiveDate) -> WindowState {
        if today < self.start_date {
            WindowState::NotStarted
        } else if today > self.end_date {
            WindowState::Ended
        } else {
            WindowState::Open
        }
    }
}

/// A survey group without an ID.
pub type NewSurveyGroup = SurveyGroupCore;

/// A survey group from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyGroup {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub group: SurveyGroupCore,
}

impl Deref for SurveyGroup {
    type Target = SurveyGroupCore;

    fn deref(&self) -> &Self::Target {
        &self.group
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use chrono::{Duration, Utc};

    use super::*;

    impl SurveyGroupCore {
        /// A group whose window contains today.
        pub fn current_example() -> Self {
            let today = Utc::now().date_naive();
            Self {
                name: "Autumn teaching feedback".to_string(),
                start_date: today - Duration::days(7),
                end_date: today + Duration::days(7),
            }
        }

        /// A group whose window is entirely in the future.
        pub fn future_example() -> Self {
            let today = Utc::now().date_naive();
            Self {
                name: "Spring teaching feedback".to_string(),
                start_date: today + Duration::days(30),
                end_date: today + Duration::days(60),
            }
        }

        /// A group whose window is entirely in the past.
        pub fn past_example() -> Self {
            let today = Utc::now().date_naive();
            Self {
                name: "Last year's feedback".to_string(),
                start_date: today - Duration::days(60),
                end_date: today - Duration::days(30),
            }
        }
    }

    impl SurveyGroup {
        pub fn current_example() -> Self {
            Self {
                id: Id::new(),
                group: SurveyGroupCore::current_example(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn window_states() {
        let today = Utc::now().date_naive();
        assert_eq!(
            SurveyGroupCore::current_example().window_state(today),
            WindowState::Open
        );
        assert_eq!(
            SurveyGroupCore::future_example().window_state(today),
            WindowState::NotStarted
        );
        assert_eq!(
            SurveyGroupCore::past_example().window_state(today),
            WindowState::Ended
        );
    }

    #[test]
    fn window_endpoints_are_inclusive() {
        let group = SurveyGroupCore::current_example();
        assert_eq!(group.window_state(group.start_date), WindowState::Open);
        assert_eq!(group.window_state(group.end_date), WindowState::Open);
    }
}
