//! Permission vocabulary
//!
//! Every capability the dashboards check is a variant of [`Permission`]. The
//! wire form (`resource:action`) is what lands in session tokens and what the
//! frontends compare against, so those strings must never change.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A fine-grained capability tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Permission {
    // Bookings
    BookingRead,
    BookingCreate,
    BookingUpdate,
    BookingDelete,
    BookingApprove,

    // Patients (pets)
    PatientRead,
    PatientCreate,
    PatientUpdate,
    PatientDelete,
    PatientMedicalRecordsRead,
    PatientMedicalRecordsWrite,

    // Medical
    MedicalRead,
    MedicalWrite,
    MedicalPrescribe,
    MedicalDiagnosis,

    // Finance
    FinanceRead,
    FinanceManage,
    FinanceReports,

    // Staff management
    StaffRead,
    StaffCreate,
    StaffUpdate,
    StaffDelete,

    // Settings
    SettingsRead,
    SettingsUpdate,
    SettingsSecurity,

    // Reviews
    ReviewRead,
    ReviewReply,
    ReviewModerate,

    // Analytics
    AnalyticsBasic,
    AnalyticsAdvanced,
    AnalyticsExport,

    // Platform administration
    PlatformAdmin,
    PlatformManageHospitals,
    PlatformManageBusinesses,
    PlatformAuditLogs,
}

impl Permission {
    /// The whole vocabulary, in declaration order
    pub const ALL: &'static [Permission] = &[
        Permission::BookingRead,
        Permission::BookingCreate,
        Permission::BookingUpdate,
        Permission::BookingDelete,
        Permission::BookingApprove,
        Permission::PatientRead,
        Permission::PatientCreate,
        Permission::PatientUpdate,
        Permission::PatientDelete,
        Permission::PatientMedicalRecordsRead,
        Permission::PatientMedicalRecordsWrite,
        Permission::MedicalRead,
        Permission::MedicalWrite,
        Permission::MedicalPrescribe,
        Permission::MedicalDiagnosis,
        Permission::FinanceRead,
        Permission::FinanceManage,
        Permission::FinanceReports,
        Permission::StaffRead,
        Permission::StaffCreate,
        Permission::StaffUpdate,
        Permission::StaffDelete,
        Permission::SettingsRead,
        Permission::SettingsUpdate,
        Permission::SettingsSecurity,
        Permission::ReviewRead,
        Permission::ReviewReply,
        Permission::ReviewModerate,
        Permission::AnalyticsBasic,
        Permission::AnalyticsAdvanced,
        Permission::AnalyticsExport,
        Permission::PlatformAdmin,
        Permission::PlatformManageHospitals,
        Permission::PlatformManageBusinesses,
        Permission::PlatformAuditLogs,
    ];

    /// Wire form of the permission
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::BookingRead => "booking:read",
            Permission::BookingCreate => "booking:create",
            Permission::BookingUpdate => "booking:update",
            Permission::BookingDelete => "booking:delete",
            Permission::BookingApprove => "booking:approve",
            Permission::PatientRead => "patient:read",
            Permission::PatientCreate => "patient:create",
            Permission::PatientUpdate => "patient:update",
            Permission::PatientDelete => "patient:delete",
            Permission::PatientMedicalRecordsRead => "patient:medical_records:read",
            Permission::PatientMedicalRecordsWrite => "patient:medical_records:write",
            Permission::MedicalRead => "medical:read",
            Permission::MedicalWrite => "medical:write",
            Permission::MedicalPrescribe => "medical:prescribe",
            Permission::MedicalDiagnosis => "medical:diagnosis",
            Permission::FinanceRead => "finance:read",
            Permission::FinanceManage => "finance:manage",
            Permission::FinanceReports => "finance:reports",
            Permission::StaffRead => "staff:read",
            Permission::StaffCreate => "staff:create",
            Permission::StaffUpdate => "staff:update",
            Permission::StaffDelete => "staff:delete",
            Permission::SettingsRead => "settings:read",
            Permission::SettingsUpdate => "settings:update",
            Permission::SettingsSecurity => "settings:security",
            Permission::ReviewRead => "review:read",
            Permission::ReviewReply => "review:reply",
            Permission::ReviewModerate => "review:moderate",
            Permission::AnalyticsBasic => "analytics:basic",
            Permission::AnalyticsAdvanced => "analytics:advanced",
            Permission::AnalyticsExport => "analytics:export",
            Permission::PlatformAdmin => "platform:admin",
            Permission::PlatformManageHospitals => "platform:manage_hospitals",
            Permission::PlatformManageBusinesses => "platform:manage_businesses",
            Permission::PlatformAuditLogs => "platform:audit_logs",
        }
    }

    /// Resource part of the tag (`patient:medical_records:read` → `patient`)
    pub fn resource(&self) -> &'static str {
        let tag = self.as_str();
        tag.split_once(':').map(|(resource, _)| resource).unwrap_or(tag)
    }

    /// Action part of the tag (`patient:medical_records:read` → `read`)
    pub fn action(&self) -> &'static str {
        let tag = self.as_str();
        tag.rsplit_once(':').map(|(_, action)| action).unwrap_or(tag)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a string is not part of the permission vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown permission: {0}")]
pub struct PermissionParseError(pub String);

impl FromStr for Permission {
    type Err = PermissionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| PermissionParseError(s.to_string()))
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Membership-only set of permissions
///
/// Serializes as a list of wire strings in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    pub fn insert(&mut self, permission: Permission) -> bool {
        self.0.insert(permission)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    /// Wire strings, catalog order
    pub fn to_strings(&self) -> Vec<String> {
        self.iter().map(|p| p.as_str().to_string()).collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<&[Permission]> for PermissionSet {
    fn from(permissions: &[Permission]) -> Self {
        permissions.iter().copied().collect()
    }
}
