//! User profile, session and authentication payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{dates, role::Role};
use crate::error::{AppError, AppResult};

/// Placeholder name used when the API omits one
pub const DEFAULT_NAME: &str = "Pengguna";
/// Placeholder for absent text fields
pub const MISSING_FIELD: &str = "-";

/// Cached profile of the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub role: Role,
    pub email: String,
    pub nis: String,
    pub major: String,
    pub grade: String,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Profile used when nobody is signed in
    pub fn guest() -> Self {
        Self {
            id: 0,
            name: "Tamu".to_string(),
            role: Role::Guest,
            email: MISSING_FIELD.to_string(),
            nis: MISSING_FIELD.to_string(),
            major: MISSING_FIELD.to_string(),
            grade: MISSING_FIELD.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Profile as sent by the login endpoint; every field may be absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileData {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub nis: Option<String>,
    pub major: Option<String>,
    pub grade: Option<String>,
    #[serde(default, deserialize_with = "dates::optional_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TryFrom<ProfileData> for UserProfile {
    type Error = AppError;

    /// Fill absent fields with defaults. An unknown role is rejected.
    fn try_from(data: ProfileData) -> AppResult<Self> {
        let role = match data.role.as_deref() {
            None => Role::Member,
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::Validation(format!("Peran pengguna tidak dikenal: {}", raw)))?,
        };

        let text = |v: Option<String>| {
            v.filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| MISSING_FIELD.to_string())
        };

        Ok(Self {
            id: data.id.unwrap_or(0),
            name: data
                .name
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_NAME.to_string()),
            role,
            email: text(data.email),
            nis: text(data.nis),
            major: text(data.major),
            grade: text(data.grade),
            created_at: data.created_at.unwrap_or_else(Utc::now),
        })
    }
}

/// Client-held proof of authentication plus cached profile
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: UserProfile,
}

impl Session {
    pub fn guest() -> Self {
        Self {
            token: None,
            user: UserProfile::guest(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn role(&self) -> Role {
        self.user.role
    }
}

/// Login request body
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: Option<String>,
    pub message: Option<String>,
    pub data: Option<ProfileData>,
}

/// Register request body
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub nis: String,
    pub major: String,
    pub grade: String,
    pub password: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults() {
        let profile = UserProfile::try_from(ProfileData::default()).unwrap();
        assert_eq!(profile.id, 0);
        assert_eq!(profile.name, DEFAULT_NAME);
        assert_eq!(profile.role, Role::Member);
        assert_eq!(profile.nis, MISSING_FIELD);
        assert_eq!(profile.major, MISSING_FIELD);
        assert!(profile.created_at <= Utc::now());
    }

    #[test]
    fn test_profile_from_full_data() {
        let data: ProfileData = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Sari",
            "role": "admin",
            "email": "sari@sekolah.id",
            "nis": "1234567",
            "major": "RPL",
            "grade": "XII",
            "created_at": "2024-01-15T08:00:00Z"
        }))
        .unwrap();

        let profile = UserProfile::try_from(data).unwrap();
        assert_eq!(profile.id, 7);
        assert_eq!(profile.role, Role::Admin);
        assert_eq!(profile.grade, "XII");
        assert_eq!(profile.created_at.to_rfc3339(), "2024-01-15T08:00:00+00:00");
    }

    #[test]
    fn test_login_response_with_sql_timestamp() {
        let response: LoginResponse = serde_json::from_value(serde_json::json!({
            "success": true,
            "token": "t",
            "data": { "role": "member", "created_at": "2024-01-15 08:00:00" }
        }))
        .unwrap();

        let profile = UserProfile::try_from(response.data.unwrap()).unwrap();
        assert_eq!(profile.created_at.to_rfc3339(), "2024-01-15T08:00:00+00:00");
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let data = ProfileData {
            role: Some("superuser".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            UserProfile::try_from(data),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_guest_session() {
        let session = Session::guest();
        assert!(!session.is_authenticated());
        assert_eq!(session.role(), Role::Guest);
    }
}
