//! User data and computed result models for the onboarding funnel.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Answers collected across the funnel steps.
///
/// Every field is optional: a field stays `None` until the step that asks
/// for it has been completed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Age in whole years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Height in centimeters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Current weight in kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_weight: Option<f64>,
    /// Target weight in kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diet_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenges: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
}

impl UserData {
    /// Shallow-merge `partial` into `self`: fields set in `partial` win,
    /// everything else is left untouched.
    ///
    /// A merge never clears an answer; an explicit JSON `null` reads as an
    /// absent field. Use [`UserData::set`] or a reset to overwrite.
    pub fn merge(&mut self, partial: UserData) {
        let UserData {
            goal,
            gender,
            age,
            height,
            current_weight,
            target_weight,
            activity_level,
            diet_type,
            challenges,
            name,
            email,
            referral_code,
        } = partial;

        if goal.is_some() {
            self.goal = goal;
        }
        if gender.is_some() {
            self.gender = gender;
        }
        if age.is_some() {
            self.age = age;
        }
        if height.is_some() {
            self.height = height;
        }
        if current_weight.is_some() {
            self.current_weight = current_weight;
        }
        if target_weight.is_some() {
            self.target_weight = target_weight;
        }
        if activity_level.is_some() {
            self.activity_level = activity_level;
        }
        if diet_type.is_some() {
            self.diet_type = diet_type;
        }
        if challenges.is_some() {
            self.challenges = challenges;
        }
        if name.is_some() {
            self.name = name;
        }
        if email.is_some() {
            self.email = email;
        }
        if referral_code.is_some() {
            self.referral_code = referral_code;
        }
    }

    /// Overwrite exactly one field.
    pub fn set(&mut self, field: UserField) {
        match field {
            UserField::Goal(v) => self.goal = Some(v),
            UserField::Gender(v) => self.gender = Some(v),
            UserField::Age(v) => self.age = Some(v),
            UserField::Height(v) => self.height = Some(v),
            UserField::CurrentWeight(v) => self.current_weight = Some(v),
            UserField::TargetWeight(v) => self.target_weight = Some(v),
            UserField::ActivityLevel(v) => self.activity_level = Some(v),
            UserField::DietType(v) => self.diet_type = Some(v),
            UserField::Challenges(v) => self.challenges = Some(v),
            UserField::Name(v) => self.name = Some(v),
            UserField::Email(v) => self.email = Some(v),
            UserField::ReferralCode(v) => self.referral_code = Some(v),
        }
    }

    /// True when no answer has been collected yet.
    pub fn is_empty(&self) -> bool {
        *self == UserData::default()
    }
}

/// A single typed user-data assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum UserField {
    Goal(String),
    Gender(String),
    Age(u32),
    Height(f64),
    CurrentWeight(f64),
    TargetWeight(f64),
    ActivityLevel(String),
    DietType(String),
    Challenges(Vec<String>),
    Name(String),
    Email(String),
    ReferralCode(String),
}

impl UserField {
    /// Every accepted key, in funnel order.
    pub const KEYS: [&'static str; 12] = [
        "goal",
        "gender",
        "age",
        "height",
        "currentWeight",
        "targetWeight",
        "activityLevel",
        "dietType",
        "challenges",
        "name",
        "email",
        "referralCode",
    ];

    /// Build a field from its camelCase key and a raw textual value.
    ///
    /// `challenges` takes a comma-separated list; blank entries are dropped.
    pub fn parse(key: &str, raw: &str) -> Result<Self> {
        let text = raw.trim().to_string();
        let field = match key {
            "goal" => Self::Goal(text),
            "gender" => Self::Gender(text),
            "age" => Self::Age(parse_number(key, raw)?),
            "height" => Self::Height(parse_measure(key, raw)?),
            "currentWeight" => Self::CurrentWeight(parse_measure(key, raw)?),
            "targetWeight" => Self::TargetWeight(parse_measure(key, raw)?),
            "activityLevel" => Self::ActivityLevel(text),
            "dietType" => Self::DietType(text),
            "challenges" => Self::Challenges(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            "name" => Self::Name(text),
            "email" => Self::Email(text),
            "referralCode" => Self::ReferralCode(text),
            other => return Err(Error::UnknownField(other.to_string())),
        };
        Ok(field)
    }

    /// The camelCase key this field is stored under.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Goal(_) => "goal",
            Self::Gender(_) => "gender",
            Self::Age(_) => "age",
            Self::Height(_) => "height",
            Self::CurrentWeight(_) => "currentWeight",
            Self::TargetWeight(_) => "targetWeight",
            Self::ActivityLevel(_) => "activityLevel",
            Self::DietType(_) => "dietType",
            Self::Challenges(_) => "challenges",
            Self::Name(_) => "name",
            Self::Email(_) => "email",
            Self::ReferralCode(_) => "referralCode",
        }
    }
}

fn parse_number<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| invalid_value(key, raw, e))
}

/// Parse a body measurement. `NaN` and infinities are rejected.
fn parse_measure(key: &str, raw: &str) -> Result<f64> {
    let value: f64 = parse_number(key, raw)?;
    if !value.is_finite() {
        return Err(invalid_value(key, raw, "must be a finite number"));
    }
    Ok(value)
}

fn invalid_value(key: &str, raw: &str, reason: impl std::fmt::Display) -> Error {
    Error::InvalidFieldValue {
        key: key.to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    }
}

/// Personalized metrics derived from [`UserData`].
///
/// Only ever replaced wholesale; see `metrics::compute_results`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Results {
    /// Daily calorie target (kcal/day).
    pub daily_calories: i64,
    /// Body mass index, one decimal place.
    pub bmi: f64,
    /// Human-readable time to goal, e.g. "3 weeks" or "5 months".
    pub estimated_time: String,
    /// Kilograms between current and target weight. May be zero or negative.
    pub weight_to_lose: f64,
    /// Projected goal date, e.g. "Mar 5, 2027". Empty when there is nothing to lose.
    pub target_date: String,
    /// Total daily energy expenditure (kcal/day).
    pub tdee: i64,
    /// Assumed weekly loss in kilograms.
    pub weekly_loss: f64,
}
