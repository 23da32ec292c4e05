use std::fmt::Display;

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::model::{admin::Admin, mongodb::Id};

/// A user of our application, having defined rights.
pub trait User {
    /// The rights of this user type.
    const RIGHTS: Rights;
    /// Get the user's ID.
    fn id(&self) -> Id;
}

/// Privilege levels. Respondents are anonymous, so the only capability is
/// the survey-administration permission carried by staff accounts.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Rights {
    SurveyAdmin = 1,
}

impl Display for Rights {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                Self::SurveyAdmin => "survey_admin",
            }
        )
    }
}

impl User for Admin {
    const RIGHTS: Rights = Rights::SurveyAdmin;

    fn id(&self) -> Id {
        self.id
    }
}
