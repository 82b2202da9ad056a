//! Raw-record normalisation into the canonical [`User`] shape.
//!
//! The source data is heterogeneous: fields go missing, numbers arrive as
//! strings and vice versa. Normalisation is total; every record comes out
//! fully defaulted and no input makes it fail. Coercions follow the loose
//! stringification the display layer was written against: scalars become
//! their display string or the field default, balances become fixed
//! two-decimal strings, loan repayments get en-US thousands grouping.

use chrono::DateTime;
use serde_json::Value;

use crate::domain::user::{EducationAndEmployment, Guarantor, PersonalInfo, User};

/// Coerce one raw record into the canonical shape.
#[must_use]
pub fn normalize_user(raw: &Value) -> User {
    let date_joined = field_string(raw, "createdAt", "");

    User {
        id: field_string(raw, "id", ""),
        organization: field_string(raw, "organization", ""),
        username: field_string(raw, "username", ""),
        email: field_string(raw, "email", ""),
        phone_number: field_string(raw, "phoneNumber", ""),
        created_at: format_display_date(&date_joined),
        date_joined,
        status: field_string(raw, "status", "Active").parse().unwrap_or_default(),
        avatar: field_string(raw, "avatar", ""),
        full_name: field_string(raw, "fullName", ""),
        user_tier: tier(raw.get("userTier")),
        account_balance: balance_string(raw.get("accountBalance")),
        account_bank: field_string(raw, "accountBank", ""),
        account_number: field_string(raw, "accountNumber", ""),
        bvn: field_string(raw, "bvn", ""),
        personal_info: personal_info(raw.get("personalInfo")),
        education_and_employment: education_and_employment(raw.get("educationAndEmployment")),
        guarantors: guarantors(raw.get("guarantors")),
    }
}

fn personal_info(block: Option<&Value>) -> PersonalInfo {
    let get = |key| block.and_then(|b| b.get(key));
    PersonalInfo {
        gender: scalar_string(get("gender"), ""),
        marital_status: scalar_string(get("maritalStatus"), ""),
        children: scalar_string(get("children"), "None"),
        type_of_residence: scalar_string(get("typeOfResidence"), ""),
        email: scalar_string(get("email"), ""),
        facebook: scalar_string(get("facebook"), ""),
        twitter: scalar_string(get("twitter"), ""),
        instagram: scalar_string(get("instagram"), ""),
    }
}

fn education_and_employment(block: Option<&Value>) -> EducationAndEmployment {
    let get = |key| block.and_then(|b| b.get(key));
    EducationAndEmployment {
        level_of_education: scalar_string(get("levelOfEducation"), ""),
        employment_status: scalar_string(get("employmentStatus"), ""),
        sector_of_employment: scalar_string(get("sectorOfEmployment"), ""),
        duration_of_employment: scalar_string(get("durationOfEmployment"), ""),
        office_email: scalar_string(get("officeEmail"), ""),
        monthly_income: scalar_string(get("monthlyIncome"), ""),
        loan_repayment: grouped_number_string(get("loanRepayment")),
    }
}

fn guarantors(value: Option<&Value>) -> Vec<Guarantor> {
    match value {
        Some(Value::Array(items)) => items.iter().map(guarantor).collect(),
        _ => Vec::new(),
    }
}

fn guarantor(raw: &Value) -> Guarantor {
    Guarantor {
        full_name: field_string(raw, "fullName", ""),
        phone_number: field_string(raw, "phoneNumber", ""),
        email: raw
            .get("email")
            .filter(|value| is_truthy(value))
            .and_then(scalar_display),
        relationship: field_string(raw, "relationship", ""),
    }
}

fn field_string(raw: &Value, key: &str, default: &str) -> String {
    scalar_string(raw.get(key), default)
}

/// Display string of a scalar, or `default` for null/absent/non-scalar.
fn scalar_string(value: Option<&Value>, default: &str) -> String {
    value
        .and_then(scalar_display)
        .unwrap_or_else(|| default.to_owned())
}

fn scalar_display(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn numeric(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        Value::Null => Some(0.0),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Account balance: numbers become fixed two-decimal strings, strings pass
/// through, anything else falls back to "0".
fn balance_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => format!("{:.2}", n.as_f64().unwrap_or_default()),
        Some(Value::Null) | None => "0".to_owned(),
        Some(other) => scalar_display(other).unwrap_or_else(|| "0".to_owned()),
    }
}

/// Tier clamped into 1..=3; non-numeric or zero input defaults to 1.
fn tier(value: Option<&Value>) -> u8 {
    let Some(n) = numeric(value) else { return 1 };
    if !n.is_finite() || n == 0.0 {
        return 1;
    }
    let truncated = n.trunc();
    if truncated <= 1.0 {
        1
    } else if truncated >= 3.0 {
        3
    } else {
        2
    }
}

/// en-US style thousands grouping with up to three fraction digits;
/// non-numeric input yields "0".
fn grouped_number_string(value: Option<&Value>) -> String {
    numeric(value).filter(|n| n.is_finite()).map_or_else(
        || "0".to_owned(),
        |n| {
            let negative = n < 0.0;
            let rendered = format!("{:.3}", n.abs());
            let (int_part, frac_part) = rendered.split_once('.').unwrap_or((&rendered, ""));

            let digits: Vec<char> = int_part.chars().collect();
            let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
            for (index, digit) in digits.iter().enumerate() {
                if index > 0 && (digits.len() - index) % 3 == 0 {
                    grouped.push(',');
                }
                grouped.push(*digit);
            }

            let frac = frac_part.trim_end_matches('0');
            if !frac.is_empty() {
                grouped.push('.');
                grouped.push_str(frac);
            }
            if negative && grouped != "0" {
                grouped.insert(0, '-');
            }
            grouped
        },
    )
}

fn format_display_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_owned(),
        |parsed| parsed.format("%b %-d, %Y %-I:%M %p").to_string(),
    )
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the coercion rules.

    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::user::UserStatus;

    #[test]
    fn empty_record_normalises_to_full_defaults() {
        let user = normalize_user(&json!({}));

        assert_eq!(user.id, "");
        assert_eq!(user.status, UserStatus::Active);
        assert_eq!(user.user_tier, 1);
        assert_eq!(user.account_balance, "0");
        assert_eq!(user.personal_info.children, "None");
        assert_eq!(user.education_and_employment.loan_repayment, "0");
        assert!(user.guarantors.is_empty());
    }

    #[test]
    fn numeric_balance_and_tier_coerce_per_contract() {
        let user = normalize_user(&json!({
            "id": "TEST001",
            "accountBalance": 1000.5,
            "userTier": 2,
        }));

        assert_eq!(user.id, "TEST001");
        assert_eq!(user.account_balance, "1000.50");
        assert_eq!(user.user_tier, 2);
    }

    #[rstest]
    #[case::string_passthrough(json!("1234.5"), "1234.5")]
    #[case::integer(json!(30), "30.00")]
    #[case::null(json!(null), "0")]
    fn balance_coercion(#[case] raw: serde_json::Value, #[case] expected: &str) {
        let user = normalize_user(&json!({ "accountBalance": raw }));
        assert_eq!(user.account_balance, expected);
    }

    #[rstest]
    #[case::absent(json!({}), 1)]
    #[case::string_number(json!({"userTier": "3"}), 3)]
    #[case::zero(json!({"userTier": 0}), 1)]
    #[case::above_range(json!({"userTier": 9}), 3)]
    #[case::garbage(json!({"userTier": "gold"}), 1)]
    fn tier_clamps_into_range(#[case] raw: serde_json::Value, #[case] expected: u8) {
        assert_eq!(normalize_user(&raw).user_tier, expected);
    }

    #[rstest]
    #[case::integer(json!(40000), "40,000")]
    #[case::string_number(json!("1234567"), "1,234,567")]
    #[case::fractional(json!(1234.56), "1,234.56")]
    #[case::small(json!(500), "500")]
    #[case::non_numeric(json!("n/a"), "0")]
    #[case::absent_block(json!(null), "0")]
    fn loan_repayment_groups_thousands(#[case] raw: serde_json::Value, #[case] expected: &str) {
        let user = normalize_user(&json!({
            "educationAndEmployment": { "loanRepayment": raw }
        }));
        assert_eq!(user.education_and_employment.loan_repayment, expected);
    }

    #[test]
    fn stringifies_numeric_scalars_in_text_fields() {
        let user = normalize_user(&json!({
            "phoneNumber": 8012345678_i64,
            "personalInfo": { "children": 2 },
        }));
        assert_eq!(user.phone_number, "8012345678");
        assert_eq!(user.personal_info.children, "2");
    }

    #[test]
    fn unknown_status_defaults_to_active() {
        let user = normalize_user(&json!({ "status": "Suspended" }));
        assert_eq!(user.status, UserStatus::Active);
    }

    #[test]
    fn created_at_is_formatted_and_raw_timestamp_retained() {
        let user = normalize_user(&json!({ "createdAt": "2020-05-15T10:00:00Z" }));
        assert_eq!(user.date_joined, "2020-05-15T10:00:00Z");
        assert_eq!(user.created_at, "May 15, 2020 10:00 AM");
    }

    #[test]
    fn unparseable_timestamp_passes_through() {
        let user = normalize_user(&json!({ "createdAt": "yesterday" }));
        assert_eq!(user.created_at, "yesterday");
    }

    #[test]
    fn guarantors_normalise_with_optional_email() {
        let user = normalize_user(&json!({
            "guarantors": [
                { "fullName": "Ada", "phoneNumber": "0801", "relationship": "Sister" },
                { "fullName": "Ben", "email": "ben@x.co", "relationship": "Friend" },
                { "fullName": "Eze", "email": "", "relationship": "Friend" },
            ]
        }));

        assert_eq!(user.guarantors.len(), 3);
        assert_eq!(user.guarantors[0].email, None);
        assert_eq!(user.guarantors[1].email.as_deref(), Some("ben@x.co"));
        assert_eq!(user.guarantors[2].email, None, "empty email is absent");
    }
}
