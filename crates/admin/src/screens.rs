//! Catalog of list screens.
//!
//! A screen contributes only what differs between screens: its
//! collection, the fields its search box covers, the relations it joins,
//! and whether rows carry an active toggle. Paging, search and patching
//! are shared through [`crate::controller::PagedListController`].

use carecms_core::query::{Pagination, QueryDescriptor, Relation};
use serde_json::Value;

/// How a screen merges successive pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// Classic pager: each load replaces the cache.
    Replace,
    /// Infinite scroll: later pages append, de-duplicated by id.
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSpec {
    /// Short name used on the command line.
    pub key: &'static str,
    pub title: &'static str,
    pub model_name: &'static str,
    pub search_fields: &'static [&'static str],
    /// `(module, alias)` pairs.
    pub relations: &'static [(&'static str, Option<&'static str>)],
    pub has_toggle: bool,
    pub mode: ListMode,
}

impl ScreenSpec {
    pub fn relations(&self) -> Vec<Relation> {
        self.relations
            .iter()
            .map(|(module, alias)| match alias {
                Some(alias) => Relation::aliased(*module, *alias),
                None => Relation::new(*module),
            })
            .collect()
    }

    /// Build the descriptor for one page of this screen.
    ///
    /// Search is sent whenever the screen has search fields, even with an
    /// empty keyword.
    pub fn query(
        &self,
        pagination: Pagination,
        keyword: &str,
        filter: &serde_json::Map<String, Value>,
    ) -> QueryDescriptor {
        let mut query = QueryDescriptor::new(self.model_name).with_pagination(pagination);
        if !self.search_fields.is_empty() {
            query = query.with_search(self.search_fields.iter().copied(), keyword);
        }
        for (field, value) in filter {
            query = query.with_filter(field.clone(), value.clone());
        }
        if !self.relations.is_empty() {
            query = query.with_relations(self.relations());
        }
        query
    }
}

const fn screen(
    key: &'static str,
    title: &'static str,
    model_name: &'static str,
    search_fields: &'static [&'static str],
) -> ScreenSpec {
    ScreenSpec {
        key,
        title,
        model_name,
        search_fields,
        relations: &[],
        has_toggle: true,
        mode: ListMode::Replace,
    }
}

pub const LANGUAGES: ScreenSpec = screen(
    "languages",
    "Language Master",
    "language_masters",
    &["language_name"],
);

pub const SPECIALTIES: ScreenSpec = screen(
    "specialties",
    "Specialty Master",
    "specialty_masters",
    &["specialty"],
);

pub const RELATIONS: ScreenSpec = screen(
    "relations",
    "Relation Master",
    "relation_masters",
    &["relation_name"],
);

pub const PRACTITIONER_SERVICES: ScreenSpec = screen(
    "practitioner-services",
    "Practitioner Service Master",
    "practitioner_service_masters",
    &["service_name"],
);

pub const INSURANCE_CARRIERS: ScreenSpec = screen(
    "insurance-carriers",
    "Insurance Carrier Master",
    "health_insurance_carrier_master",
    &["health_insurance_carrier_name"],
);

pub const INSURANCES: ScreenSpec = ScreenSpec {
    relations: &[(
        "health_insurance_carrier_master",
        Some("health_insurance_carrier_master"),
    )],
    ..screen(
        "insurances",
        "Insurance Master",
        "insurance_masters",
        &[
            "insurance_name",
            "health_insurance_carrier_master.health_insurance_carrier_name",
        ],
    )
};

pub const SUBSCRIPTIONS: ScreenSpec = ScreenSpec {
    mode: ListMode::Append,
    ..screen(
        "subscriptions",
        "Subscription Master",
        "subscription_masters",
        &["type", "name", "duration_type", "duration", "actual_price", "price"],
    )
};

pub const HELP: ScreenSpec = screen("help", "Help", "free_text_details", &["title"]);

pub const FAQS: ScreenSpec = screen("faqs", "FAQ", "faqs", &["faq_title"]);

pub const TESTIMONIALS: ScreenSpec = screen("testimonials", "Testimonials", "blogs", &["title"]);

pub const SERVICE_DETAILS: ScreenSpec = screen(
    "service-details",
    "Service Details",
    "services_details",
    &["name"],
);

pub const CMS_USERS: ScreenSpec = ScreenSpec {
    has_toggle: false,
    ..screen(
        "cms-users",
        "CMS Users",
        "cms_users",
        &["full_name", "email", "mobile_no"],
    )
};

pub const PATIENTS: ScreenSpec = ScreenSpec {
    has_toggle: false,
    ..screen(
        "patients",
        "Patients",
        "patients",
        &["first_name", "email", "last_name", "zipcode", "gender"],
    )
};

pub const PATIENT_APPOINTMENTS: ScreenSpec = ScreenSpec {
    relations: &[
        ("clinics", Some("clinics")),
        ("patients", Some("patients")),
        ("practitioners", Some("practitioners")),
    ],
    has_toggle: false,
    mode: ListMode::Append,
    ..screen(
        "appointments",
        "Patient Appointments",
        "patient_appointments",
        &[
            "patients.first_name",
            "clinics.name",
            "practitioners.f_name",
            "status",
        ],
    )
};

pub const CLINICS: ScreenSpec = ScreenSpec {
    has_toggle: false,
    ..screen("clinics", "Clinics", "clinics", &["name", "email"])
};

pub const PRACTITIONERS: ScreenSpec = ScreenSpec {
    has_toggle: false,
    ..screen(
        "practitioners",
        "Practitioners",
        "practitioners",
        &["f_name", "l_name", "email"],
    )
};

/// Every list screen, in menu order.
pub const ALL: &[ScreenSpec] = &[
    LANGUAGES,
    SPECIALTIES,
    RELATIONS,
    PRACTITIONER_SERVICES,
    INSURANCE_CARRIERS,
    INSURANCES,
    SUBSCRIPTIONS,
    HELP,
    FAQS,
    TESTIMONIALS,
    SERVICE_DETAILS,
    CMS_USERS,
    PATIENTS,
    PATIENT_APPOINTMENTS,
    CLINICS,
    PRACTITIONERS,
];

/// Look a screen up by its key or its collection name.
pub fn find(name: &str) -> Option<&'static ScreenSpec> {
    ALL.iter()
        .find(|screen| screen.key == name || screen.model_name == name)
}
