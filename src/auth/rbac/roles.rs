//! Role catalog and the role→permission table

use super::catalog::{Permission, PermissionSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use Permission::*;

/// Tenant kind a principal belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganizationType {
    Hospital,
    Business,
    Platform,
}

impl OrganizationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizationType::Hospital => "HOSPITAL",
            OrganizationType::Business => "BUSINESS",
            OrganizationType::Platform => "PLATFORM",
        }
    }

    /// Whether staff of this organization type can pick it on the login form
    pub fn is_login_selectable(&self) -> bool {
        !matches!(self, OrganizationType::Platform)
    }
}

impl fmt::Display for OrganizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrganizationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HOSPITAL" => Ok(OrganizationType::Hospital),
            "BUSINESS" => Ok(OrganizationType::Business),
            "PLATFORM" => Ok(OrganizationType::Platform),
            other => Err(format!("unknown organization type: {}", other)),
        }
    }
}

/// Staff role; exactly one per authenticated session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    HospitalAdmin,
    HospitalStaff,
    HospitalVet,
    BusinessOwner,
    BusinessManager,
    BusinessStaff,
    PlatformAdmin,
    PlatformSupport,
}

impl UserRole {
    pub const ALL: &'static [UserRole] = &[
        UserRole::HospitalAdmin,
        UserRole::HospitalStaff,
        UserRole::HospitalVet,
        UserRole::BusinessOwner,
        UserRole::BusinessManager,
        UserRole::BusinessStaff,
        UserRole::PlatformAdmin,
        UserRole::PlatformSupport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::HospitalAdmin => "HOSPITAL_ADMIN",
            UserRole::HospitalStaff => "HOSPITAL_STAFF",
            UserRole::HospitalVet => "HOSPITAL_VET",
            UserRole::BusinessOwner => "BUSINESS_OWNER",
            UserRole::BusinessManager => "BUSINESS_MANAGER",
            UserRole::BusinessStaff => "BUSINESS_STAFF",
            UserRole::PlatformAdmin => "PLATFORM_ADMIN",
            UserRole::PlatformSupport => "PLATFORM_SUPPORT",
        }
    }

    /// Organization type the role belongs to
    pub fn organization_type(&self) -> OrganizationType {
        match self {
            UserRole::HospitalAdmin | UserRole::HospitalStaff | UserRole::HospitalVet => {
                OrganizationType::Hospital
            }
            UserRole::BusinessOwner | UserRole::BusinessManager | UserRole::BusinessStaff => {
                OrganizationType::Business
            }
            UserRole::PlatformAdmin | UserRole::PlatformSupport => OrganizationType::Platform,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UserRole::HospitalAdmin => "Full hospital access",
            UserRole::HospitalStaff => "Front-desk hospital access",
            UserRole::HospitalVet => "Veterinarian with medical access",
            UserRole::BusinessOwner => "Full business access",
            UserRole::BusinessManager => "Business management access",
            UserRole::BusinessStaff => "Basic business access",
            UserRole::PlatformAdmin => "Platform administrator",
            UserRole::PlatformSupport => "Platform support agent",
        }
    }

    /// Permissions granted to the role, straight from the table
    pub fn granted(&self) -> &'static [Permission] {
        match self {
            UserRole::HospitalAdmin => &[
                BookingRead,
                BookingCreate,
                BookingUpdate,
                BookingDelete,
                BookingApprove,
                PatientRead,
                PatientCreate,
                PatientUpdate,
                PatientDelete,
                PatientMedicalRecordsRead,
                PatientMedicalRecordsWrite,
                MedicalRead,
                MedicalWrite,
                MedicalDiagnosis,
                FinanceRead,
                FinanceManage,
                FinanceReports,
                StaffRead,
                StaffCreate,
                StaffUpdate,
                StaffDelete,
                SettingsRead,
                SettingsUpdate,
                SettingsSecurity,
                ReviewRead,
                ReviewReply,
                ReviewModerate,
                AnalyticsBasic,
                AnalyticsAdvanced,
                AnalyticsExport,
            ],
            UserRole::HospitalStaff => &[
                BookingRead,
                BookingCreate,
                BookingUpdate,
                PatientRead,
                PatientCreate,
                PatientUpdate,
                PatientMedicalRecordsRead,
                MedicalRead,
                ReviewRead,
                AnalyticsBasic,
            ],
            UserRole::HospitalVet => &[
                BookingRead,
                BookingUpdate,
                PatientRead,
                PatientUpdate,
                PatientMedicalRecordsRead,
                PatientMedicalRecordsWrite,
                MedicalRead,
                MedicalWrite,
                MedicalPrescribe,
                MedicalDiagnosis,
                ReviewRead,
                AnalyticsBasic,
            ],
            UserRole::BusinessOwner => &[
                BookingRead,
                BookingCreate,
                BookingUpdate,
                BookingDelete,
                PatientRead,
                PatientCreate,
                PatientUpdate,
                FinanceRead,
                FinanceReports,
                StaffRead,
                StaffCreate,
                StaffUpdate,
                StaffDelete,
                SettingsRead,
                SettingsUpdate,
                ReviewRead,
                ReviewReply,
                AnalyticsBasic,
                AnalyticsAdvanced,
                AnalyticsExport,
            ],
            UserRole::BusinessManager => &[
                BookingRead,
                BookingCreate,
                BookingUpdate,
                PatientRead,
                PatientCreate,
                PatientUpdate,
                FinanceRead,
                FinanceReports,
                StaffRead,
                SettingsRead,
                ReviewRead,
                ReviewReply,
                AnalyticsBasic,
                AnalyticsAdvanced,
            ],
            UserRole::BusinessStaff => &[
                BookingRead,
                BookingCreate,
                PatientRead,
                PatientCreate,
                ReviewRead,
                AnalyticsBasic,
            ],
            UserRole::PlatformAdmin => &[
                PlatformAdmin,
                PlatformManageHospitals,
                PlatformManageBusinesses,
                PlatformAuditLogs,
                AnalyticsBasic,
                AnalyticsAdvanced,
                AnalyticsExport,
                SettingsRead,
                SettingsUpdate,
                SettingsSecurity,
            ],
            UserRole::PlatformSupport => &[
                PlatformManageHospitals,
                PlatformManageBusinesses,
                PlatformAuditLogs,
                AnalyticsBasic,
            ],
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown role: {}", s))
    }
}

/// Resolve the permission set for a role
///
/// Total over [`UserRole`]; a role with no grants yields an empty set.
pub fn permissions_for(role: UserRole) -> PermissionSet {
    role.granted().iter().copied().collect()
}
