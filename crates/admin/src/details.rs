//! Detail views and lookup lists.
//!
//! Detail screens show one record plus the child collections that hang
//! off it by foreign key. Lookups feed select boxes with active rows only.

use serde::Serialize;
use serde_json::Value;

use carecms_client::{ClientError, MasterGateway};
use carecms_core::error::CoreError;
use carecms_core::mutation::MutationCommand;
use carecms_core::paging::LOOKUP_PAGE_SIZE;
use carecms_core::query::{Pagination, QueryDescriptor, Relation};
use carecms_core::types::{is_active, record_id, Record, RecordId, ID_FIELD};

use crate::error::LoadError;

pub const LOCATIONS_MODEL: &str = "clinic_locations";
pub const REVIEW_LINK_FIELD: &str = "google_business_link";

// ---------------------------------------------------------------------------
// Generic fetches
// ---------------------------------------------------------------------------

/// Fetch one record of `model_name` by id.
pub async fn fetch_by_id<G: MasterGateway + ?Sized>(
    gateway: &G,
    model_name: &str,
    id: &RecordId,
    relations: Vec<Relation>,
) -> Result<Record, LoadError> {
    let query = QueryDescriptor::new(model_name)
        .with_filter(ID_FIELD, id.to_value())
        .with_relations(relations);

    tracing::debug!(model_name, id = %id, "Fetching record");
    let result = gateway.list(&query).await?;
    result.rows.into_iter().next().ok_or_else(|| {
        LoadError::Core(CoreError::NotFound {
            model_name: model_name.to_string(),
            id: id.clone(),
        })
    })
}

/// Fetch every `model_name` row whose `foreign_key` equals `owner`.
pub async fn fetch_children<G: MasterGateway + ?Sized>(
    gateway: &G,
    model_name: &str,
    foreign_key: &str,
    owner: &RecordId,
    relations: Vec<Relation>,
) -> Result<Vec<Record>, ClientError> {
    let query = QueryDescriptor::new(model_name)
        .with_filter(foreign_key, owner.to_value())
        .with_relations(relations);
    Ok(gateway.list(&query).await?.rows)
}

// ---------------------------------------------------------------------------
// Clinic and practitioner details
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicDetails {
    pub clinic: Record,
    pub subscriptions: Vec<Record>,
    pub insurances: Vec<Record>,
    pub locations: Vec<Record>,
}

pub async fn load_clinic<G: MasterGateway + ?Sized>(
    gateway: &G,
    id: &RecordId,
) -> Result<ClinicDetails, LoadError> {
    let clinic = fetch_by_id(gateway, "clinics", id, Vec::new()).await?;
    let (subscriptions, insurances, locations) = tokio::try_join!(
        fetch_children(
            gateway,
            "clinic_subscriptions",
            "clinic_id",
            id,
            vec![Relation::new("subscription_masters")],
        ),
        fetch_children(
            gateway,
            "clinic_insurances",
            "clinic_id",
            id,
            vec![Relation::new("insurance_masters")],
        ),
        fetch_children(gateway, LOCATIONS_MODEL, "clinic_id", id, Vec::new()),
    )?;

    Ok(ClinicDetails {
        clinic,
        subscriptions,
        insurances,
        locations,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PractitionerDetails {
    pub practitioner: Record,
    pub appointment_types: Vec<Record>,
    pub specialties: Vec<Record>,
    pub subscriptions: Vec<Record>,
    pub services: Vec<Record>,
    pub symptoms: Vec<Record>,
}

pub async fn load_practitioner<G: MasterGateway + ?Sized>(
    gateway: &G,
    id: &RecordId,
) -> Result<PractitionerDetails, LoadError> {
    let practitioner = fetch_by_id(
        gateway,
        "practitioners",
        id,
        vec![Relation::aliased("clinics", "clinic")],
    )
    .await?;

    let child = move |model: &'static str, relation: Option<&'static str>| {
        fetch_children(
            gateway,
            model,
            "practitioner_id",
            id,
            relation.map(Relation::new).into_iter().collect(),
        )
    };
    let (appointment_types, specialties, subscriptions, services, symptoms) = tokio::try_join!(
        child("practitioner_appointment_types", None),
        child("practitioner_specialtys", Some("specialty_masters")),
        child("practitioner_subscriptions", Some("subscription_masters")),
        child(
            "practitioner_service_experts",
            Some("practitioner_service_masters")
        ),
        child(
            "practitioner_symptoms_experts",
            Some("practitioner_symptoms_masters")
        ),
    )?;

    Ok(PractitionerDetails {
        practitioner,
        appointment_types,
        specialties,
        subscriptions,
        services,
        symptoms,
    })
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// One entry of a select box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupOption {
    pub id: RecordId,
    pub label: String,
}

/// Active rows of `model_name`, labelled by `label_field`.
///
/// Rows without an id are skipped; a missing label renders as empty.
pub async fn lookup_options<G: MasterGateway + ?Sized>(
    gateway: &G,
    model_name: &str,
    label_field: &str,
    pagination: Option<Pagination>,
) -> Result<Vec<LookupOption>, ClientError> {
    let mut query = QueryDescriptor::new(model_name);
    if let Some(pagination) = pagination {
        query = query.with_pagination(pagination);
    }
    let rows = gateway.list(&query).await?.rows;

    Ok(rows
        .iter()
        .filter(|row| is_active(row))
        .filter_map(|row| {
            let id = record_id(row)?;
            let label = match row.get(label_field) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            Some(LookupOption { id, label })
        })
        .collect())
}

/// Insurance carriers offered by the insurance plan form.
pub async fn carrier_options<G: MasterGateway + ?Sized>(
    gateway: &G,
) -> Result<Vec<LookupOption>, ClientError> {
    lookup_options(
        gateway,
        "health_insurance_carrier_master",
        "health_insurance_carrier_name",
        Some(Pagination::clamped(1, LOOKUP_PAGE_SIZE)),
    )
    .await
}

/// Services offered by the service detail form.
pub async fn service_options<G: MasterGateway + ?Sized>(
    gateway: &G,
) -> Result<Vec<LookupOption>, ClientError> {
    lookup_options(gateway, "services", "name", None).await
}

// ---------------------------------------------------------------------------
// Bulk review link update
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct BulkOutcome {
    pub saved: Vec<Record>,
    pub failed: Vec<(RecordId, ClientError)>,
}

impl BulkOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Set the review link on each location. Every update is sent on its own;
/// one failure does not stop the rest.
pub async fn update_location_reviews<G: MasterGateway + ?Sized>(
    gateway: &G,
    links: &[(RecordId, String)],
) -> BulkOutcome {
    let mut outcome = BulkOutcome::default();
    for (id, link) in links {
        let command = MutationCommand::update(LOCATIONS_MODEL, id.clone())
            .set(REVIEW_LINK_FIELD, link.trim());
        match gateway.upsert(&command).await {
            Ok(record) => outcome.saved.push(record),
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Review link update failed");
                outcome.failed.push((id.clone(), e));
            }
        }
    }
    tracing::info!(
        saved = outcome.saved.len(),
        failed = outcome.failed.len(),
        "Review link update finished",
    );
    outcome
}
