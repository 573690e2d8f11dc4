//! Case record and draft models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::field::CaseField;

/// The free-text values collected by the entry form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CaseDraft {
    pub patient_name: String,
    pub patient_id: String,
    pub surgery_name: String,
    pub anaesthesia_name: String,
    pub drug_doses: String,
    pub incidents: String,
    pub monitoring: String,
    pub blood_loss: String,
    pub fluid_management: String,
    pub regional_anesthesia: String,
    pub extubation: String,
    pub postoperative_recovery: String,
}

impl CaseDraft {
    /// Read one field.
    pub fn get(&self, field: CaseField) -> &str {
        match field {
            CaseField::PatientName => &self.patient_name,
            CaseField::PatientId => &self.patient_id,
            CaseField::SurgeryName => &self.surgery_name,
            CaseField::AnaesthesiaName => &self.anaesthesia_name,
            CaseField::DrugDoses => &self.drug_doses,
            CaseField::Monitoring => &self.monitoring,
            CaseField::BloodLoss => &self.blood_loss,
            CaseField::FluidManagement => &self.fluid_management,
            CaseField::RegionalAnesthesia => &self.regional_anesthesia,
            CaseField::Incidents => &self.incidents,
            CaseField::Extubation => &self.extubation,
            CaseField::PostoperativeRecovery => &self.postoperative_recovery,
        }
    }

    /// Overwrite one field.
    pub fn set(&mut self, field: CaseField, value: impl Into<String>) {
        let slot = match field {
            CaseField::PatientName => &mut self.patient_name,
            CaseField::PatientId => &mut self.patient_id,
            CaseField::SurgeryName => &mut self.surgery_name,
            CaseField::AnaesthesiaName => &mut self.anaesthesia_name,
            CaseField::DrugDoses => &mut self.drug_doses,
            CaseField::Monitoring => &mut self.monitoring,
            CaseField::BloodLoss => &mut self.blood_loss,
            CaseField::FluidManagement => &mut self.fluid_management,
            CaseField::RegionalAnesthesia => &mut self.regional_anesthesia,
            CaseField::Incidents => &mut self.incidents,
            CaseField::Extubation => &mut self.extubation,
            CaseField::PostoperativeRecovery => &mut self.postoperative_recovery,
        };
        *slot = value.into();
    }

    /// True when every field is empty.
    pub fn is_blank(&self) -> bool {
        CaseField::ALL.iter().all(|f| self.get(*f).is_empty())
    }
}

/// A logged anaesthesia case. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    /// Random UUID, used as a list key only
    pub id: String,
    pub patient_name: String,
    /// Hospital ID / MRN
    pub patient_id: String,
    #[serde(default)]
    pub surgery_name: String,
    #[serde(default)]
    pub anaesthesia_name: String,
    #[serde(default)]
    pub drug_doses: String,
    #[serde(default)]
    pub incidents: String,
    #[serde(default)]
    pub monitoring: String,
    #[serde(default)]
    pub blood_loss: String,
    #[serde(default)]
    pub fluid_management: String,
    #[serde(default)]
    pub regional_anesthesia: String,
    #[serde(default)]
    pub extubation: String,
    #[serde(default)]
    pub postoperative_recovery: String,
    /// Creation time, milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl CaseRecord {
    /// Mint a record from a draft with a fresh ID, stamped at `now`.
    pub fn from_draft(draft: CaseDraft, now: DateTime<Utc>) -> Self {
        Self::with_identity(draft, uuid::Uuid::new_v4().to_string(), now.timestamp_millis())
    }

    /// Build a record with an explicit ID and timestamp.
    pub fn with_identity(draft: CaseDraft, id: String, timestamp: i64) -> Self {
        Self {
            id,
            patient_name: draft.patient_name,
            patient_id: draft.patient_id,
            surgery_name: draft.surgery_name,
            anaesthesia_name: draft.anaesthesia_name,
            drug_doses: draft.drug_doses,
            incidents: draft.incidents,
            monitoring: draft.monitoring,
            blood_loss: draft.blood_loss,
            fluid_management: draft.fluid_management,
            regional_anesthesia: draft.regional_anesthesia,
            extubation: draft.extubation,
            postoperative_recovery: draft.postoperative_recovery,
            timestamp,
        }
    }

    /// Read one of the text fields.
    pub fn field(&self, field: CaseField) -> &str {
        match field {
            CaseField::PatientName => &self.patient_name,
            CaseField::PatientId => &self.patient_id,
            CaseField::SurgeryName => &self.surgery_name,
            CaseField::AnaesthesiaName => &self.anaesthesia_name,
            CaseField::DrugDoses => &self.drug_doses,
            CaseField::Monitoring => &self.monitoring,
            CaseField::BloodLoss => &self.blood_loss,
            CaseField::FluidManagement => &self.fluid_management,
            CaseField::RegionalAnesthesia => &self.regional_anesthesia,
            CaseField::Incidents => &self.incidents,
            CaseField::Extubation => &self.extubation,
            CaseField::PostoperativeRecovery => &self.postoperative_recovery,
        }
    }

    /// Creation time, if it falls in chrono's representable range.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}
