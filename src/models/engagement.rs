use serde::{Deserialize, Serialize};

/// Secret-drop mailing list entry. Email is unique; a repeat signup is a 409.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signup {
    pub id: String,
    pub email: String,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateSignup {
    pub email: String,
}

/// Running click counter for one social platform link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialClick {
    pub platform: String,
    pub click_count: i64,
}
