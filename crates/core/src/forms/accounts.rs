//! CMS user accounts and clinic provider entries.

use serde_json::Value;

use super::{FormDraft, FormMode};
use crate::types::{flag_value, Record, IS_ACTIVE_FIELD};
use crate::validation::{rules, FieldErrors};

const PASSWORD_RULE_MESSAGE: &str = "Password Must Be At Least 8 Characters Long And Contain \
     At Least One Lowercase Letter, One Uppercase Letter, One Digit, And One Special Character";

/// A back-office user. New users are registered through `auth/signUp`;
/// edits go through the generic upsert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmsUserDraft {
    pub full_name: String,
    /// Formatted as typed, see [`crate::validation::phone::format_mobile_number`].
    pub mobile_no: String,
    pub email: String,
    pub password: String,
    pub is_active: bool,
}

impl CmsUserDraft {
    fn password_given(&self) -> bool {
        !self.password.is_empty()
    }

    /// New users need a password; edits only check one that was typed and
    /// otherwise keep the current one.
    fn checks_password(&self, mode: &FormMode) -> bool {
        mode.is_create() || self.password_given()
    }
}

impl FormDraft for CmsUserDraft {
    const MODEL_NAME: &'static str = "cms_users";
    const SIGN_UP_ON_CREATE: bool = true;

    fn validate(&self, mode: &FormMode) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors
            .field("full_name", &self.full_name)
            .required("Full Name Is Required")
            .satisfies(
                rules::is_person_name,
                "Full Name Can Only Contain Letters And Spaces",
            )
            .no_leading_space("Full Name Should Not Start With A Space")
            .min_len(6, "Full Name Must Be At Least 6 Characters Long");
        errors
            .field("mobile_no", &self.mobile_no)
            .required("Mobile Number Is Required")
            .phone(
                "Invalid Contact Number Format Must Be In (XXX) XXX-XXXX or +XX (XXX) XXX-XXXX Format",
            );
        errors
            .field("email", &self.email)
            .required("Email Is Required")
            .no_leading_space("Email Should Not Start With A Space")
            .email("Invalid Email Format");
        if self.checks_password(mode) {
            errors
                .field("password", &self.password)
                .required("Password Is Required")
                .no_leading_space("Password Should Not Start With A Space")
                .satisfies(rules::is_strong_password, PASSWORD_RULE_MESSAGE);
        }
        errors
    }

    fn input_data(&self, mode: &FormMode) -> Record {
        let mut input = Record::new();
        input.insert("full_name".into(), Value::from(self.full_name.trim()));
        input.insert("mobile_no".into(), Value::from(self.mobile_no.trim()));
        input.insert("email".into(), Value::from(self.email.trim()));
        if self.checks_password(mode) {
            input.insert("password".into(), Value::from(self.password.as_str()));
        }
        if mode.is_create() {
            input.insert(IS_ACTIVE_FIELD.into(), flag_value(self.is_active));
        }
        input
    }
}

/// A provider entered during clinic sign-up. Providers are collected
/// locally and submitted with the clinic, so this draft validates only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderDraft {
    pub npi_number: String,
    pub healthcare_provider: String,
    pub provider_type: String,
    pub provider_email: String,
    pub profile: String,
    pub calendar: String,
}

impl ProviderDraft {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors
            .field("npi_number", &self.npi_number)
            .required("NIP Number Is Required")
            .satisfies(rules::is_npi_number, "NIP Number Must Be Up To 10 Digits Long");
        errors
            .field("healthcare_provider", &self.healthcare_provider)
            .required("Healthcare Provider Is Required")
            .min_len(6, "Healthcare Provider Must Be At Least 6 Characters Long")
            .alphabetic("Healthcare Provider Can Only Contain Letters and Spaces");
        errors
            .field("provider_type", &self.provider_type)
            .required("Provider Type Is Required")
            .alphanumeric("Provider Type Can Only Contain Letters, Numbers, and Spaces");
        errors
            .field("provider_email", &self.provider_email)
            .required("Provider Email Is Required")
            .email("Invalid Email Format");
        errors
            .field("profile", &self.profile)
            .required("Profile Photo Is Required");
        errors
            .field("calendar", &self.calendar)
            .required("Calendar Link Is Required");
        errors
    }
}
