//! Recommendation and alert rules.
//!
//! Both generators are fixed, ordered rule lists evaluated against the
//! current values. Every matching rule contributes, in list order. A
//! fallback entry is emitted only when no rule matched.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::trend::Trend;

/// The inputs every rule is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub humidity: f64,
    pub light: f64,
    pub temperature_trend: Trend,
    pub humidity_trend: Trend,
}

/// A predicate paired with what it produces when it holds.
#[derive(Debug, Clone, Copy)]
pub struct Rule<T: 'static> {
    /// Short identifier, stable across releases.
    pub name: &'static str,
    pub applies: fn(&CurrentConditions) -> bool,
    pub output: T,
}

/// Severity of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Info,
    Success,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::Warning => write!(f, "warning"),
            AlertKind::Info => write!(f, "info"),
            AlertKind::Success => write!(f, "success"),
        }
    }
}

/// An alert shown alongside the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

pub const OPTIMAL_MESSAGE: &str = "Environmental conditions are optimal";

pub const ALL_NORMAL_MESSAGE: &str = "All environmental parameters are within normal ranges";

pub const RECOMMENDATION_RULES: &[Rule<&str>] = &[
    Rule {
        name: "cooling",
        applies: |c| c.temperature > 28.0,
        output: "Consider cooling the environment or improving ventilation",
    },
    Rule {
        name: "heating",
        applies: |c| c.temperature < 18.0,
        output: "Consider heating the environment for better comfort",
    },
    Rule {
        name: "dehumidify",
        applies: |c| c.humidity > 70.0,
        output: "High humidity detected - consider using a dehumidifier",
    },
    Rule {
        name: "humidify",
        applies: |c| c.humidity < 30.0,
        output: "Low humidity detected - consider using a humidifier",
    },
    Rule {
        name: "lighting",
        applies: |c| c.light < 200.0,
        output: "Low light levels - consider improving lighting for better visibility",
    },
];

pub const ALERT_RULES: &[Rule<(AlertKind, &str)>] = &[
    Rule {
        name: "overheat",
        applies: |c| c.temperature > 32.0,
        output: (
            AlertKind::Warning,
            "High temperature alert - take cooling measures",
        ),
    },
    Rule {
        name: "cold",
        applies: |c| c.temperature < 10.0,
        output: (
            AlertKind::Warning,
            "Low temperature alert - heating recommended",
        ),
    },
    Rule {
        name: "condensation",
        applies: |c| c.humidity > 85.0,
        output: (AlertKind::Warning, "Very high humidity - risk of condensation"),
    },
    Rule {
        name: "dry_air",
        applies: |c| c.humidity < 20.0,
        output: (AlertKind::Warning, "Very low humidity - may cause discomfort"),
    },
    Rule {
        name: "warming",
        applies: |c| c.temperature_trend == Trend::Rising && c.temperature > 26.0,
        output: (
            AlertKind::Info,
            "Temperature is rising - monitor for overheating",
        ),
    },
    Rule {
        name: "moistening",
        applies: |c| c.humidity_trend == Trend::Rising && c.humidity > 65.0,
        output: (
            AlertKind::Info,
            "Humidity is increasing - watch for condensation",
        ),
    },
];

/// Outputs of every rule that holds, in rule order.
pub fn matching<'a, T: Copy>(
    rules: &'a [Rule<T>],
    conditions: &'a CurrentConditions,
) -> impl Iterator<Item = T> + 'a {
    rules
        .iter()
        .filter(move |rule| (rule.applies)(conditions))
        .map(|rule| rule.output)
}

/// Recommendations for the current conditions; never empty.
pub fn recommendations(conditions: &CurrentConditions) -> Vec<String> {
    let mut out: Vec<String> = matching(RECOMMENDATION_RULES, conditions)
        .map(String::from)
        .collect();
    if out.is_empty() {
        out.push(OPTIMAL_MESSAGE.to_string());
    }
    out
}

/// Alerts for the current conditions; never empty.
pub fn alerts(conditions: &CurrentConditions) -> Vec<Alert> {
    let mut out: Vec<Alert> = matching(ALERT_RULES, conditions)
        .map(|(kind, message)| Alert::new(kind, message))
        .collect();
    if out.is_empty() {
        out.push(Alert::new(AlertKind::Success, ALL_NORMAL_MESSAGE));
    }
    out
}
