//! Form field schema.

use std::fmt;
use std::str::FromStr;

/// Section of the entry form a field is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormSection {
    /// Demographics and procedure
    PatientAndProcedure,
    /// Drugs, monitoring, losses and fluids
    AnaestheticManagement,
    /// Regional, incidents, airway and recovery
    AdditionalClinical,
}

impl FormSection {
    /// Heading shown above the section.
    pub fn title(&self) -> &'static str {
        match self {
            Self::PatientAndProcedure => "Patient & Procedure Details",
            Self::AnaestheticManagement => "Anaesthetic Management",
            Self::AdditionalClinical => "Additional Clinical Details",
        }
    }
}

/// One of the twelve user-editable case fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseField {
    PatientName,
    PatientId,
    SurgeryName,
    AnaesthesiaName,
    DrugDoses,
    Monitoring,
    BloodLoss,
    FluidManagement,
    RegionalAnesthesia,
    Incidents,
    Extubation,
    PostoperativeRecovery,
}

impl CaseField {
    /// All fields in form display order.
    pub const ALL: [CaseField; 12] = [
        CaseField::PatientName,
        CaseField::PatientId,
        CaseField::SurgeryName,
        CaseField::AnaesthesiaName,
        CaseField::DrugDoses,
        CaseField::Monitoring,
        CaseField::BloodLoss,
        CaseField::FluidManagement,
        CaseField::RegionalAnesthesia,
        CaseField::Incidents,
        CaseField::Extubation,
        CaseField::PostoperativeRecovery,
    ];

    /// Attribute name used in the persisted JSON.
    pub fn json_name(&self) -> &'static str {
        match self {
            Self::PatientName => "patientName",
            Self::PatientId => "patientId",
            Self::SurgeryName => "surgeryName",
            Self::AnaesthesiaName => "anaesthesiaName",
            Self::DrugDoses => "drugDoses",
            Self::Monitoring => "monitoring",
            Self::BloodLoss => "bloodLoss",
            Self::FluidManagement => "fluidManagement",
            Self::RegionalAnesthesia => "regionalAnesthesia",
            Self::Incidents => "incidents",
            Self::Extubation => "extubation",
            Self::PostoperativeRecovery => "postoperativeRecovery",
        }
    }

    /// Input label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PatientName => "Patient Name",
            Self::PatientId => "Patient ID",
            Self::SurgeryName => "Surgery/Procedure",
            Self::AnaesthesiaName => "Anaesthesia Technique",
            Self::DrugDoses => "Drug Doses (Induction & Maintenance)",
            Self::Monitoring => "Monitoring & Notable Readings",
            Self::BloodLoss => "Estimated Blood Loss",
            Self::FluidManagement => "Fluid Management",
            Self::RegionalAnesthesia => "Regional Anaesthesia",
            Self::Incidents => "Intraoperative Incidents/Events",
            Self::Extubation => "Extubation & Airway Management",
            Self::PostoperativeRecovery => "Postoperative Recovery",
        }
    }

    /// Example text shown in an empty input.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::PatientName => "Enter patient name",
            Self::PatientId => "Enter patient ID/MRN",
            Self::SurgeryName => "e.g., Laparoscopic cholecystectomy",
            Self::AnaesthesiaName => "e.g., General anaesthesia with ETT",
            Self::DrugDoses => "e.g., Propofol 150mg, Fentanyl 100µg, Sevoflurane 2%",
            Self::Monitoring => "e.g., ASA standard + BIS 45-60, TOF >0.9 at closure",
            Self::BloodLoss => "e.g., 300mL",
            Self::FluidManagement => "e.g., Hartmann's 1500mL, Gelofusine 500mL",
            Self::RegionalAnesthesia => "e.g., US-guided interscalene block, 20mL 0.5% ropivacaine",
            Self::Incidents => "e.g., Hypotension managed with phenylephrine 100µg",
            Self::Extubation => "e.g., Smooth extubation at MAC ≤0.2",
            Self::PostoperativeRecovery => "e.g., Aldrete 9 at 15 min, pain 2/10, no PONV",
        }
    }

    /// Whether a case cannot be submitted with this field empty.
    pub fn is_required(&self) -> bool {
        matches!(self, Self::PatientName | Self::PatientId)
    }

    /// Whether the field takes multi-line text.
    pub fn is_multiline(&self) -> bool {
        !matches!(self.section(), FormSection::PatientAndProcedure)
    }

    pub fn section(&self) -> FormSection {
        match self {
            Self::PatientName | Self::PatientId | Self::SurgeryName | Self::AnaesthesiaName => {
                FormSection::PatientAndProcedure
            }
            Self::DrugDoses | Self::Monitoring | Self::BloodLoss | Self::FluidManagement => {
                FormSection::AnaestheticManagement
            }
            Self::RegionalAnesthesia
            | Self::Incidents
            | Self::Extubation
            | Self::PostoperativeRecovery => FormSection::AdditionalClinical,
        }
    }

    /// Required fields only.
    pub fn required() -> impl Iterator<Item = CaseField> {
        Self::ALL.into_iter().filter(|f| f.is_required())
    }
}

impl fmt::Display for CaseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_name())
    }
}

/// Returned when a string names no known field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown case field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for CaseField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.json_name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
