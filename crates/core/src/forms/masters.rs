//! Simple master-data forms: a name plus an active flag, edited in a
//! modal over the list screen.

use serde_json::Value;

use super::{FormDraft, FormMode};
use crate::types::{flag_value, record_id, text, Record, RecordId, IS_ACTIVE_FIELD};
use crate::validation::{rules, FieldErrors};

/// Input for a single-name master. Creates also carry the active flag;
/// edits send the name alone.
fn named_master_input(field: &str, name: &str, is_active: bool, mode: &FormMode) -> Record {
    let mut input = Record::new();
    input.insert(field.to_string(), Value::from(name.trim()));
    if mode.is_create() {
        input.insert(IS_ACTIVE_FIELD.to_string(), flag_value(is_active));
    }
    input
}

/// Lowercased values of `field` across `rows`, skipping the row being
/// edited so a record never collides with itself.
pub fn taken_names(rows: &[Record], field: &str, editing: Option<&RecordId>) -> Vec<String> {
    rows.iter()
        .filter(|row| editing.is_none() || record_id(row).as_ref() != editing)
        .filter_map(|row| text(row, field))
        .map(|name| name.trim().to_lowercase())
        .collect()
}

fn is_taken(taken: &[String], name: &str) -> bool {
    let name = name.trim().to_lowercase();
    taken.iter().any(|t| *t == name)
}

// ---------------------------------------------------------------------------
// Language / specialty / relation / practitioner service
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageDraft {
    pub name: String,
    pub is_active: bool,
}

impl FormDraft for LanguageDraft {
    const MODEL_NAME: &'static str = "language_masters";

    fn validate(&self, _mode: &FormMode) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors
            .field("language_name", &self.name)
            .required("Please Enter The Language.");
        errors
    }

    fn input_data(&self, mode: &FormMode) -> Record {
        named_master_input("language_name", &self.name, self.is_active, mode)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialtyDraft {
    pub name: String,
    pub is_active: bool,
}

impl FormDraft for SpecialtyDraft {
    const MODEL_NAME: &'static str = "specialty_masters";

    fn validate(&self, _mode: &FormMode) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors
            .field("specialty", &self.name)
            .required("Please Enter The Specialty Name");
        errors
    }

    fn input_data(&self, mode: &FormMode) -> Record {
        named_master_input("specialty", &self.name, self.is_active, mode)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationDraft {
    pub name: String,
    pub is_active: bool,
}

impl FormDraft for RelationDraft {
    const MODEL_NAME: &'static str = "relation_masters";

    fn validate(&self, _mode: &FormMode) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors
            .field("relation_name", &self.name)
            .required("Please Enter The Relation Name");
        errors
    }

    fn input_data(&self, mode: &FormMode) -> Record {
        named_master_input("relation_name", &self.name, self.is_active, mode)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PractitionerServiceDraft {
    pub name: String,
    pub is_active: bool,
}

impl FormDraft for PractitionerServiceDraft {
    const MODEL_NAME: &'static str = "practitioner_service_masters";

    fn validate(&self, _mode: &FormMode) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors
            .field("service_name", &self.name)
            .required("Please Enter The Service Name");
        errors
    }

    fn input_data(&self, mode: &FormMode) -> Record {
        named_master_input("service_name", &self.name, self.is_active, mode)
    }
}

// ---------------------------------------------------------------------------
// Insurance carrier
// ---------------------------------------------------------------------------

pub const CARRIER_NAME_FIELD: &str = "health_insurance_carrier_name";

/// Carrier names must be unique, case-insensitively, among the loaded
/// rows; populate `taken` with [`InsuranceCarrierDraft::with_taken_names`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsuranceCarrierDraft {
    pub name: String,
    pub is_active: bool,
    pub taken: Vec<String>,
}

impl InsuranceCarrierDraft {
    pub fn with_taken_names(mut self, rows: &[Record], editing: Option<&RecordId>) -> Self {
        self.taken = taken_names(rows, CARRIER_NAME_FIELD, editing);
        self
    }
}

impl FormDraft for InsuranceCarrierDraft {
    const MODEL_NAME: &'static str = "health_insurance_carrier_master";

    fn validate(&self, _mode: &FormMode) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors
            .field(CARRIER_NAME_FIELD, &self.name)
            .required("Please Enter The Insurance Carrier")
            .no_leading_space("Insurance Carrier Name Should Not Start With A Space")
            .min_len(3, "Please Enter At Least 3 Characters")
            .satisfies(
                |v| v.trim().chars().all(|c| c.is_ascii_alphanumeric() || c == ' '),
                "Insurance Carrier Name Should Not Contain Only Symbols",
            )
            .satisfies(
                |v| !rules::is_only_digits(v),
                "Insurance Carrier Name Should Not Contain Only Numbers",
            )
            .satisfies(
                |v| !is_taken(&self.taken, v),
                "Insurance Carrier Name Already Exists",
            );
        errors
    }

    fn input_data(&self, mode: &FormMode) -> Record {
        named_master_input(CARRIER_NAME_FIELD, &self.name, self.is_active, mode)
    }
}

// ---------------------------------------------------------------------------
// Insurance plan
// ---------------------------------------------------------------------------

/// An insurance plan under a carrier. Plan names are compared exactly,
/// not case-folded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsuranceDraft {
    pub carrier_id: Option<RecordId>,
    pub name: String,
    pub taken: Vec<String>,
}

impl InsuranceDraft {
    pub fn with_taken_names(mut self, rows: &[Record], editing: Option<&RecordId>) -> Self {
        self.taken = rows
            .iter()
            .filter(|row| editing.is_none() || record_id(row).as_ref() != editing)
            .filter_map(|row| text(row, "insurance_name"))
            .map(str::to_string)
            .collect();
        self
    }
}

impl FormDraft for InsuranceDraft {
    const MODEL_NAME: &'static str = "insurance_masters";

    fn validate(&self, _mode: &FormMode) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.carrier_id.is_none() {
            errors.insert("health_insurance_carrier_master_id", "Carrier Name Is Required");
        }
        errors
            .field("insurance_name", &self.name)
            .required("Insurance Name Is Required")
            .no_leading_space("Insurance Name Should Not Start With A Space")
            .min_len(3, "Insurance Name Should Be At Least 3 Characters Long")
            .satisfies(
                |v| !self.taken.iter().any(|t| t == v),
                "Insurance Name Already Exists",
            )
            .satisfies(
                |v| v.chars().all(|c| c.is_ascii_alphanumeric() || c.is_whitespace()),
                "Insurance Name Should Not Contain Special Symbols",
            )
            .satisfies(
                |v| v.chars().any(|c| c.is_ascii_alphabetic()),
                "Insurance Name Should Not Contain Only Numbers",
            );
        errors
    }

    fn input_data(&self, mode: &FormMode) -> Record {
        let mut input = Record::new();
        if let Some(carrier) = &self.carrier_id {
            input.insert("health_insurance_carrier_master_id".into(), carrier.to_value());
        }
        input.insert("insurance_name".into(), Value::from(self.name.trim()));
        if mode.is_create() {
            input.insert(IS_ACTIVE_FIELD.into(), flag_value(true));
        }
        input
    }
}
