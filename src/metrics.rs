//! Personalized health metrics: BMI, BMR/TDEE, calorie target and time to goal.
//!
//! [`compute_results`] is total. Missing answers degrade to fixed defaults
//! instead of failing, so it can run at any point in the funnel. The only
//! impure input is today's date, which comes from an injected [`Clock`].

use chrono::{Days, Local, NaiveDate};

use crate::flow::{Results, UserData};

/// Healthy loss rate assumed for every projection (kg/week).
pub const WEEKLY_LOSS_KG: f64 = 0.5;
/// Deficit subtracted from TDEE to reach roughly 0.5 kg/week.
pub const DAILY_DEFICIT_KCAL: f64 = 500.0;
/// Placeholder BMI when height or weight is missing. Not a measurement.
pub const DEFAULT_BMI: f64 = 22.0;
/// Calorie target when BMR inputs are missing.
pub const DEFAULT_DAILY_CALORIES: i64 = 1800;
/// Time estimate when there is no weight to lose.
pub const DEFAULT_ESTIMATED_TIME: &str = "8-12 weeks";
/// Calorie floor for the male branch.
pub const MIN_CALORIES_MALE: i64 = 1500;
/// Calorie floor for every other gender value.
pub const MIN_CALORIES_OTHER: i64 = 1200;

/// Gender tag that selects the male Mifflin–St Jeor offset.
const MALE: &str = "male";

/// Source of "today" for target-date projections.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock date in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Activity levels offered by the funnel, with their TDEE multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// Look up a level by its tag. Unknown tags return `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "sedentary" => Some(Self::Sedentary),
            "light" => Some(Self::Light),
            "moderate" => Some(Self::Moderate),
            "active" => Some(Self::Active),
            "very_active" => Some(Self::VeryActive),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::Active => 1.725,
            Self::VeryActive => 1.9,
        }
    }

    /// Multiplier for an optional tag; missing or unknown tags use `Moderate`.
    pub fn multiplier_for(tag: Option<&str>) -> f64 {
        tag.and_then(Self::from_tag).unwrap_or_default().multiplier()
    }
}

/// Compute the full results snapshot for `data`.
pub fn compute_results(data: &UserData, clock: &dyn Clock) -> Results {
    let current_weight = present(data.current_weight);
    let target_weight = present(data.target_weight);
    let height = present(data.height);
    let age = data.age.filter(|a| *a != 0).map(f64::from);
    let is_male = data.gender.as_deref() == Some(MALE);

    let bmi = match (height, current_weight) {
        (Some(h), Some(w)) => bmi(w, h),
        _ => DEFAULT_BMI,
    };

    let weight_to_lose = match (current_weight, target_weight) {
        (Some(current), Some(target)) => current - target,
        _ => 0.0,
    };

    let maintenance = match (current_weight, height, age) {
        (Some(w), Some(h), Some(a)) => {
            let multiplier = ActivityLevel::multiplier_for(data.activity_level.as_deref());
            Some(bmr(w, h, a, is_male) * multiplier)
        }
        _ => None,
    };

    let (tdee, daily_calories) = match maintenance {
        Some(kcal) => {
            let floor = if is_male {
                MIN_CALORIES_MALE
            } else {
                MIN_CALORIES_OTHER
            };
            let target = round_half_up(kcal - DAILY_DEFICIT_KCAL) as i64;
            (round_half_up(kcal) as i64, target.max(floor))
        }
        None => (0, DEFAULT_DAILY_CALORIES),
    };

    let (estimated_time, target_date) = match weeks_to_goal(weight_to_lose) {
        Some(weeks) => (
            format_estimated_time(weeks),
            format_target_date(clock.today(), weeks),
        ),
        None => (DEFAULT_ESTIMATED_TIME.to_string(), String::new()),
    };

    Results {
        daily_calories,
        bmi,
        estimated_time,
        weight_to_lose,
        target_date,
        tdee,
        weekly_loss: WEEKLY_LOSS_KG,
    }
}

/// BMI rounded to one decimal place.
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let meters = height_cm / 100.0;
    round_to_tenth(weight_kg / (meters * meters))
}

/// Mifflin–St Jeor basal metabolic rate.
///
/// Gender is a two-way switch: anything other than `male` takes the
/// female offset.
pub fn bmr(weight_kg: f64, height_cm: f64, age_years: f64, is_male: bool) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years;
    if is_male { base + 5.0 } else { base - 161.0 }
}

/// Whole weeks to lose `weight_to_lose` at the fixed weekly rate, if positive.
pub fn weeks_to_goal(weight_to_lose: f64) -> Option<u64> {
    if weight_to_lose > 0.0 {
        Some((weight_to_lose / WEEKLY_LOSS_KG).ceil() as u64)
    } else {
        None
    }
}

/// "3 weeks" under four weeks, otherwise whole (4-week) months.
pub fn format_estimated_time(weeks: u64) -> String {
    if weeks < 4 {
        format!("{weeks} weeks")
    } else {
        let months = weeks.div_ceil(4);
        if months == 1 {
            "1 month".to_string()
        } else {
            format!("{months} months")
        }
    }
}

/// `today + weeks`, as an en-US short date ("Mar 5, 2027").
pub fn format_target_date(today: NaiveDate, weeks: u64) -> String {
    today
        .checked_add_days(Days::new(weeks.saturating_mul(7)))
        .map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

/// Round half toward positive infinity, as the web client did.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// A numeric answer only counts when it is set and non-zero.
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && v.is_finite())
}
