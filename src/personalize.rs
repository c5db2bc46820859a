//! Placeholder substitution for personalized funnel copy.
//!
//! Supported placeholders:
//! - `{name}`: the user's name
//! - `{goal}`: the goal tag with underscores as spaces
//! - `{weight}`: target weight
//! - `{weightToLose}`: kilograms to lose, rounded
//!
//! A placeholder whose data is missing stays in the text verbatim.

use crate::flow::{Results, UserData};
use crate::metrics::round_half_up;

/// Substitute every supported placeholder in `text`.
pub fn personalize_text(
    text: &str,
    user_data: Option<&UserData>,
    results: Option<&Results>,
) -> String {
    let Some(data) = user_data else {
        return text.to_string();
    };
    let mut out = text.to_string();

    if let Some(name) = data.name.as_deref().filter(|n| !n.is_empty()) {
        out = out.replace("{name}", name);
    }

    if let Some(goal) = data.goal.as_deref().filter(|g| !g.is_empty()) {
        out = out.replace("{goal}", &goal.replace('_', " "));
    }

    if let Some(target) = measured(data.target_weight) {
        out = out.replace("{weight}", &target.to_string());
    }

    let weight_to_lose = results
        .map(|r| r.weight_to_lose)
        .filter(|w| *w != 0.0 && w.is_finite())
        .or_else(|| match (measured(data.current_weight), measured(data.target_weight)) {
            (Some(current), Some(target)) => Some(current - target),
            _ => None,
        });
    if let Some(kg) = weight_to_lose {
        out = out.replace("{weightToLose}", &(round_half_up(kg) as i64).to_string());
    }

    out
}

fn measured(value: Option<f64>) -> Option<f64> {
    value.filter(|w| *w != 0.0 && w.is_finite())
}
