//! Client-side filter criteria over the user list.

use serde::{Deserialize, Serialize};

use crate::domain::user::{User, UserStatus};

/// Optional partial predicate over the user list.
///
/// Text fields match as case-insensitive substrings (phone number matches as
/// a plain substring); status matches exactly; `date_joined` matches the
/// day part (`YYYY-MM-DD`) of the record's raw join timestamp. Empty or
/// blank criteria impose no constraint, so the default value matches every
/// record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserFilters {
    /// Organisation substring, case-insensitive.
    pub organization: Option<String>,
    /// Username substring, case-insensitive.
    pub username: Option<String>,
    /// Email substring, case-insensitive.
    pub email: Option<String>,
    /// Phone number substring.
    pub phone_number: Option<String>,
    /// Exact status match.
    pub status: Option<UserStatus>,
    /// Exact join day in `YYYY-MM-DD` form.
    pub date_joined: Option<String>,
}

fn active(criterion: &Option<String>) -> Option<&str> {
    criterion.as_deref().filter(|value| !value.trim().is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl UserFilters {
    /// Whether no criterion is set; an empty filter set disables filtering.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        active(&self.organization).is_none()
            && active(&self.username).is_none()
            && active(&self.email).is_none()
            && active(&self.phone_number).is_none()
            && self.status.is_none()
            && active(&self.date_joined).is_none()
    }

    /// Evaluate the conjunction of all set criteria against one record.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        if let Some(organization) = active(&self.organization)
            && !contains_ignore_case(&user.organization, organization)
        {
            return false;
        }
        if let Some(username) = active(&self.username)
            && !contains_ignore_case(&user.username, username)
        {
            return false;
        }
        if let Some(email) = active(&self.email)
            && !contains_ignore_case(&user.email, email)
        {
            return false;
        }
        if let Some(phone) = active(&self.phone_number)
            && !user.phone_number.contains(phone)
        {
            return false;
        }
        if let Some(status) = self.status
            && user.status != status
        {
            return false;
        }
        if let Some(day) = active(&self.date_joined) {
            let joined_day = user.date_joined.split('T').next().unwrap_or_default();
            if joined_day != day {
                return false;
            }
        }
        true
    }
}
