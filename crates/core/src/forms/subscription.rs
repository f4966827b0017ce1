//! Subscription plan form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{FormDraft, FormMode};
use crate::types::{flag_value, Record, IS_ACTIVE_FIELD};
use crate::validation::{rules, FieldErrors};

/// Who a plan is sold to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanAudience {
    Patient,
    Clinic,
    Practitioner,
}

/// Billing period of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationType {
    Annually,
    Monthly,
}

impl PlanAudience {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanAudience::Patient => "Patient",
            PlanAudience::Clinic => "Clinic",
            PlanAudience::Practitioner => "Practitioner",
        }
    }
}

impl DurationType {
    pub fn as_str(self) -> &'static str {
        match self {
            DurationType::Annually => "Annually",
            DurationType::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for PlanAudience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DurationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanAudience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Patient" => Ok(PlanAudience::Patient),
            "Clinic" => Ok(PlanAudience::Clinic),
            "Practitioner" => Ok(PlanAudience::Practitioner),
            other => Err(format!("unknown plan type '{other}'")),
        }
    }
}

impl FromStr for DurationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Annually" => Ok(DurationType::Annually),
            "Monthly" => Ok(DurationType::Monthly),
            other => Err(format!("unknown duration type '{other}'")),
        }
    }
}

/// Drop characters a plan name may not contain while typing: anything
/// that is not a word character, whitespace or `-`.
pub fn sanitize_plan_name(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace() || *c == '-')
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionDraft {
    pub audience: Option<PlanAudience>,
    pub name: String,
    pub price: String,
    pub actual_price: String,
    pub duration_type: Option<DurationType>,
    pub duration: String,
    pub is_active: bool,
}

impl FormDraft for SubscriptionDraft {
    const MODEL_NAME: &'static str = "subscription_masters";

    fn validate(&self, _mode: &FormMode) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.audience.is_none() {
            errors.insert("type", "Type Is Required");
        }
        errors
            .field("name", &self.name)
            .required("Name Is Required")
            .satisfies(|v| !rules::is_numeric(v), "Name Cannot Be Only Numbers")
            .satisfies(
                |v| !rules::is_only_symbols(v),
                "Name Cannot Contain Only Special Symbols",
            )
            .satisfies(rules::has_letter_run, "Name Must Contain At Least 3 Alphabets");
        errors
            .field("price", &self.price)
            .required("Price Is Required")
            .decimal("Price Must Be A Number");
        errors
            .field("actual_price", &self.actual_price)
            .required("Price Is Required")
            .decimal("Actual Price Must Be A Number");
        if self.duration_type.is_none() {
            errors.insert("duration_type", "Duration Type Is Required");
        }
        errors
            .field("duration", &self.duration)
            .required("Duration Is Required")
            .numeric("Duration Must Be A Number");
        errors
    }

    fn input_data(&self, mode: &FormMode) -> Record {
        let mut input = Record::new();
        let select = |value: Option<&'static str>| value.map_or(Value::Null, Value::from);
        input.insert("type".into(), select(self.audience.map(PlanAudience::as_str)));
        input.insert("name".into(), Value::from(self.name.trim()));
        input.insert("price".into(), Value::from(self.price.trim()));
        input.insert("actual_price".into(), Value::from(self.actual_price.trim()));
        input.insert(
            "duration_type".into(),
            select(self.duration_type.map(DurationType::as_str)),
        );
        input.insert("duration".into(), Value::from(self.duration.trim()));
        if mode.is_create() {
            input.insert(IS_ACTIVE_FIELD.into(), flag_value(self.is_active));
        }
        input
    }
}
