// Authentication wire types

use serde::{Deserialize, Serialize};

/// Renewal response payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Account role on the booking service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

/// Cached snapshot of the authenticated user
///
/// Stored alongside the access token for offline display. It may lag behind
/// unrelated profile edits, but is always replaced together with the token on
/// a fresh authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Login request payload
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request payload
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Verification request payload (emailed one-time code)
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub email: String,
    pub code: String,
}

/// Successful authentication payload: token and profile arrive together
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_response_deserializes_camel_case() {
        let payload = r#"{
            "accessToken": "T1",
            "user": {
                "id": "u42",
                "firstName": "Ada",
                "lastName": "Okafor",
                "email": "ada@example.com",
                "role": "doctor",
                "photoUrl": "https://cdn.medibook.health/u42.jpg"
            }
        }"#;

        let auth: AuthResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(auth.access_token, "T1");
        assert_eq!(auth.user.role, Role::Doctor);
        assert_eq!(auth.user.phone, None);
        assert_eq!(
            auth.user.photo_url.as_deref(),
            Some("https://cdn.medibook.health/u42.jpg")
        );
    }

    #[test]
    fn test_user_profile_roundtrip() {
        let profile = UserProfile {
            id: "u1".to_string(),
            first_name: "Sam".to_string(),
            last_name: "Lee".to_string(),
            email: "sam@example.com".to_string(),
            role: Role::Patient,
            phone: Some("+4470000000".to_string()),
            photo_url: None,
        };

        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"firstName\":\"Sam\""));
        assert!(json.contains("\"role\":\"patient\""));
        assert!(!json.contains("photoUrl"));

        let back: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
