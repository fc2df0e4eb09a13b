use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

/// Simple in-memory rate limiter
pub struct RateLimiter {
    requests: Mutex<HashMap<String, Vec<SystemTime>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
        }
    }

    /// Returns true if allowed, false if rate limit exceeded
    pub fn check_rate_limit(&self, key: &str, max_requests: usize, window: Duration) -> bool {
        let now = SystemTime::now();
        let mut requests = self
            .requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let entry = requests.entry(key.to_string()).or_default();

        entry.retain(|&time| now.duration_since(time).unwrap_or(Duration::from_secs(0)) < window);

        if entry.len() >= max_requests {
            return false;
        }

        entry.push(now);

        // Drop empty keys so the map does not grow without bound.
        requests.retain(|_, times| !times.is_empty());

        true
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

pub struct PasswordValidator;

impl PasswordValidator {
    pub const MIN_LENGTH: usize = 6;

    pub fn validate(password: &str) -> Result<(), String> {
        if password.chars().count() < Self::MIN_LENGTH {
            return Err(format!(
                "Password must be at least {} characters",
                Self::MIN_LENGTH
            ));
        }

        Ok(())
    }
}

pub fn validate_email(email: &str) -> bool {
    let email = email.trim();

    if email.is_empty() || email.len() > 254 {
        return false;
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || local.len() > 64 || domain.is_empty() {
        return false;
    }

    // Domain must have at least one dot
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }

    !email.chars().any(char::is_whitespace)
}

/// At least ten digits; spaces, dashes, dots, parentheses and a leading `+` are allowed.
pub fn validate_phone(phone: &str) -> bool {
    let phone = phone.trim();
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();

    digits >= 10
        && phone.chars().enumerate().all(|(i, c)| {
            c.is_ascii_digit()
                || matches!(c, ' ' | '-' | '.' | '(' | ')')
                || (c == '+' && i == 0)
        })
}

pub fn generic_error_message(context: &str) -> String {
    format!(
        "An error occurred while processing your {}. Please try again.",
        context
    )
}
