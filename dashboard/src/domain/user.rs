//! Canonical user record and status enum.
//!
//! Every field of [`User`] is fully defaulted: the normalisation layer in
//! `outbound::users` coerces heterogeneous raw records into this shape, so
//! consumers never see missing values. Records are built fresh on each fetch
//! and never mutated in place; status edits live in the override store and
//! are layered on during view derivation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account status displayed and filtered on throughout the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserStatus {
    /// Account in good standing.
    #[default]
    Active,
    /// Dormant account.
    Inactive,
    /// Account awaiting review.
    Pending,
    /// Account barred from the platform.
    Blacklisted,
}

impl UserStatus {
    /// Canonical display label, identical to the serialised form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Pending => "Pending",
            Self::Blacklisted => "Blacklisted",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised status label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised user status: {label}")]
pub struct UserStatusParseError {
    /// The rejected input.
    pub label: String,
}

impl FromStr for UserStatus {
    type Err = UserStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "pending" => Ok(Self::Pending),
            "blacklisted" => Ok(Self::Blacklisted),
            _ => Err(UserStatusParseError {
                label: s.to_owned(),
            }),
        }
    }
}

/// Personal details nested block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    /// Gender as reported by the source.
    pub gender: String,
    /// Marital status label.
    pub marital_status: String,
    /// Number of children, kept as the source's display string.
    pub children: String,
    /// Residence type label.
    pub type_of_residence: String,
    /// Personal email address.
    pub email: String,
    /// Facebook handle.
    pub facebook: String,
    /// Twitter handle.
    pub twitter: String,
    /// Instagram handle.
    pub instagram: String,
}

impl Default for PersonalInfo {
    fn default() -> Self {
        Self {
            gender: String::new(),
            marital_status: String::new(),
            children: "None".to_owned(),
            type_of_residence: String::new(),
            email: String::new(),
            facebook: String::new(),
            twitter: String::new(),
            instagram: String::new(),
        }
    }
}

/// Education and employment nested block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationAndEmployment {
    /// Highest education level.
    pub level_of_education: String,
    /// Employment status label.
    pub employment_status: String,
    /// Employment sector.
    pub sector_of_employment: String,
    /// Employment duration label.
    pub duration_of_employment: String,
    /// Work email address.
    pub office_email: String,
    /// Monthly income band.
    pub monthly_income: String,
    /// Loan repayment amount as an en-US thousands-grouped string; "0" when
    /// the source value is absent or non-numeric.
    pub loan_repayment: String,
}

impl Default for EducationAndEmployment {
    fn default() -> Self {
        Self {
            level_of_education: String::new(),
            employment_status: String::new(),
            sector_of_employment: String::new(),
            duration_of_employment: String::new(),
            office_email: String::new(),
            monthly_income: String::new(),
            loan_repayment: "0".to_owned(),
        }
    }
}

/// A user's guarantor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guarantor {
    /// Guarantor full name.
    pub full_name: String,
    /// Guarantor phone number.
    pub phone_number: String,
    /// Guarantor email, absent when the source omits it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Relationship to the user.
    pub relationship: String,
}

/// Canonical, fully-defaulted user record consumed by all views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identifier from the source record.
    pub id: String,
    /// Organisation the user belongs to.
    pub organization: String,
    /// Login/handle.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone_number: String,
    /// Creation timestamp formatted for display.
    pub created_at: String,
    /// Raw source timestamp, used for day-level join-date filtering.
    pub date_joined: String,
    /// Displayed status before any override is applied.
    pub status: UserStatus,
    /// Avatar URL.
    pub avatar: String,
    /// Full display name.
    pub full_name: String,
    /// Tier in 1..=3.
    pub user_tier: u8,
    /// Account balance as a fixed two-decimal string.
    pub account_balance: String,
    /// Bank name.
    pub account_bank: String,
    /// Bank account number.
    pub account_number: String,
    /// Bank verification number.
    pub bvn: String,
    /// Personal details block.
    pub personal_info: PersonalInfo,
    /// Education and employment block.
    pub education_and_employment: EducationAndEmployment,
    /// Ordered guarantor list, empty when the source has none.
    pub guarantors: Vec<Guarantor>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: String::new(),
            organization: String::new(),
            username: String::new(),
            email: String::new(),
            phone_number: String::new(),
            created_at: String::new(),
            date_joined: String::new(),
            status: UserStatus::Active,
            avatar: String::new(),
            full_name: String::new(),
            user_tier: 1,
            account_balance: "0".to_owned(),
            account_bank: String::new(),
            account_number: String::new(),
            bvn: String::new(),
            personal_info: PersonalInfo::default(),
            education_and_employment: EducationAndEmployment::default(),
            guarantors: Vec::new(),
        }
    }
}
