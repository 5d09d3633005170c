use super::*;
use acct_core::ID;
use acct_core::Unique;
use serde::Deserialize;
use serde::Serialize;

const MIN_PASSWORD: usize = 4;
const MAX_EMAIL: usize = 254;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateRequest {
    pub id: Option<ID<User>>,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: ID<User>,
    pub name: String,
    pub email: String,
    pub created_at: u64,
    pub updated_at: u64,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        let secs = |t: std::time::SystemTime| {
            t.duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default()
        };
        Self {
            id: user.id(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            created_at: secs(user.created_at()),
            updated_at: secs(user.updated_at()),
        }
    }
}

impl SignupRequest {
    /// Trims and escapes in place; returns every field-level problem.
    pub fn sanitize(&mut self) -> Fields {
        let mut errors = Fields::new();
        self.name = name(&self.name, &mut errors);
        self.email = email(&self.email, &mut errors);
        self.password = password(&self.password, &mut errors);
        errors
    }
}

impl LoginRequest {
    pub fn sanitize(&mut self) -> Fields {
        let mut errors = Fields::new();
        self.email = email(&self.email, &mut errors);
        self.password = password(&self.password, &mut errors);
        errors
    }
}

impl UpdateRequest {
    pub fn sanitize(&mut self) -> Fields {
        let mut errors = Fields::new();
        if self.id.is_none() {
            errors.insert("id", "id is required".to_string());
        }
        self.name = name(&self.name, &mut errors);
        self.password = password(&self.password, &mut errors);
        errors
    }
}

fn name(raw: &str, errors: &mut Fields) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.insert("name", "name must not be empty".to_string());
    }
    escape(trimmed)
}

fn email(raw: &str, errors: &mut Fields) -> String {
    let trimmed = raw.trim();
    if !valid_email(trimmed) {
        errors.insert("email", "invalid email".to_string());
    }
    trimmed.to_lowercase()
}

fn password(raw: &str, errors: &mut Fields) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_PASSWORD {
        errors.insert(
            "password",
            format!("password must contain at least {} characters", MIN_PASSWORD),
        );
    }
    trimmed.to_string()
}

pub fn valid_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    s.len() <= MAX_EMAIL
        && !local.is_empty()
        && !domain.contains('@')
        && !s.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// HTML-escapes the characters that could smuggle markup into a name.
pub fn escape(s: &str) -> String {
    s.chars().fold(String::with_capacity(s.len()), |mut out, c| {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            c => out.push(c),
        }
        out
    })
}
