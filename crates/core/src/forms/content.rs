//! Content forms: FAQs, help text, testimonials and service details.
//!
//! Descriptions come from the rich-text editor as HTML and are checked
//! for visible text, not just non-empty markup.

use serde_json::Value;

use super::{FormDraft, FormMode};
use crate::types::{flag_value, Record, RecordId, IS_ACTIVE_FIELD};
use crate::validation::FieldErrors;

/// Help entries all hang off the single free-text section.
pub const HELP_FREE_TEXT_ID: i64 = 1;

fn check_title(errors: &mut FieldErrors, field: &str, value: &str) {
    errors
        .field(field, value)
        .required("Please Enter The Title")
        .no_leading_space("Title Should Not Start With A Space")
        .min_len(3, "Title Should Be At Least 3 Characters Long");
}

fn check_description(errors: &mut FieldErrors, value: &str) {
    errors
        .field("description", value)
        .rich_text("Please Enter The Description")
        .no_leading_space("Description Should Not Start With A Space");
}

fn mark_created(input: &mut Record, mode: &FormMode) {
    if mode.is_create() {
        input.insert(IS_ACTIVE_FIELD.into(), flag_value(true));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaqDraft {
    pub title: String,
    pub sequence: String,
    pub description: String,
}

impl FormDraft for FaqDraft {
    const MODEL_NAME: &'static str = "faqs";

    fn validate(&self, _mode: &FormMode) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_title(&mut errors, "faq_title", &self.title);
        errors.field("sequence", &self.sequence).required("Please Enter Sequence");
        check_description(&mut errors, &self.description);
        errors
    }

    fn input_data(&self, mode: &FormMode) -> Record {
        let mut input = Record::new();
        input.insert("faq_title".into(), Value::from(self.title.trim()));
        input.insert("sequence".into(), Value::from(self.sequence.trim()));
        input.insert("description".into(), Value::from(self.description.as_str()));
        mark_created(&mut input, mode);
        input
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpDraft {
    pub title: String,
    pub description: String,
}

impl FormDraft for HelpDraft {
    const MODEL_NAME: &'static str = "free_text_details";

    fn validate(&self, _mode: &FormMode) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_title(&mut errors, "title", &self.title);
        errors
            .field("description", &self.description)
            .required("Please Enter The Description")
            .no_leading_space("Description Should Not Start With A Space")
            .rich_text("Description Should Not Be Empty");
        errors
    }

    fn input_data(&self, mode: &FormMode) -> Record {
        let mut input = Record::new();
        input.insert("free_text_id".into(), Value::from(HELP_FREE_TEXT_ID));
        input.insert("title".into(), Value::from(self.title.trim()));
        input.insert("description".into(), Value::from(self.description.as_str()));
        mark_created(&mut input, mode);
        input
    }
}

/// Testimonial or blog card with the author's name and photo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestimonialDraft {
    /// Card type selected in the form, e.g. `testimonial`.
    pub kind: String,
    pub name: String,
    /// Uploaded photo reference; encoding is handled by the uploader.
    pub image: Option<String>,
    pub description: String,
}

impl FormDraft for TestimonialDraft {
    const MODEL_NAME: &'static str = "blogs";

    fn validate(&self, _mode: &FormMode) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.field("type", &self.kind).required("Please Select The Type");
        errors
            .field("title", &self.name)
            .required("Please Enter The Practitioner/Provider Name")
            .no_leading_space("Name Should Not Start With A Space")
            .alphabetic("Name Should Contain Only Alphabets And Spaces")
            .min_len(3, "Name Should Be At Least 3 Characters Long");
        if self.image.as_deref().is_none_or(str::is_empty) {
            errors.insert("image", "Please Add The Photo");
        }
        check_description(&mut errors, &self.description);
        errors
    }

    fn input_data(&self, mode: &FormMode) -> Record {
        let mut input = Record::new();
        input.insert("title".into(), Value::from(self.name.trim()));
        input.insert(
            "image".into(),
            self.image.clone().map_or(Value::Null, Value::from),
        );
        input.insert("description".into(), Value::from(self.description.trim()));
        input.insert("type".into(), Value::from(self.kind.as_str()));
        mark_created(&mut input, mode);
        input
    }
}

/// Detail card shown under one of the platform's services.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDetailDraft {
    /// Id of the parent row in `services`.
    pub service_id: Option<RecordId>,
    pub name: String,
    pub description: String,
    pub sequence: String,
    pub image: Option<String>,
}

impl FormDraft for ServiceDetailDraft {
    const MODEL_NAME: &'static str = "services_details";

    fn validate(&self, _mode: &FormMode) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.service_id.is_none() {
            errors.insert("service_id", "Please Select The Service");
        }
        errors
            .field("title", &self.name)
            .required("Please Enter  Name")
            .no_leading_space("Name Should Not Start With A Space")
            .min_len(3, "Name Should Be At Least 3 Characters Long");
        check_description(&mut errors, &self.description);
        errors
            .field("sequences", &self.sequence)
            .required("Please Enter The Sequence");
        errors
    }

    fn input_data(&self, mode: &FormMode) -> Record {
        let mut input = Record::new();
        if let Some(service) = &self.service_id {
            input.insert("service_id".into(), service.to_value());
        }
        input.insert("title".into(), Value::from(self.name.trim()));
        input.insert("description".into(), Value::from(self.description.trim()));
        input.insert("sequences".into(), Value::from(self.sequence.trim()));
        input.insert(
            "image".into(),
            self.image.clone().map_or(Value::Null, Value::from),
        );
        mark_created(&mut input, mode);
        input
    }
}
