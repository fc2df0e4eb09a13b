//! Who may see what.
//!
//! A request is `Anonymous` without a live session. A signed-in user is
//! `Admin` when their profile carries the admin flag or their email is on the
//! configured allowlist, and `Member` otherwise.

use crate::models::Profile;

#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub enum Access {
    Anonymous,
    Member,
    Admin,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Denial {
    SignInRequired { admin_area: bool },
    AdminRequired,
}

impl Denial {
    pub fn redirect_target(&self) -> &'static str {
        match self {
            Self::SignInRequired { admin_area: true } => "/admin/login",
            Self::SignInRequired { admin_area: false } => "/login?error=signin",
            Self::AdminRequired => "/?error=admin",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::SignInRequired { .. } => "Please sign in to access this page",
            Self::AdminRequired => "You need admin access to view this page",
        }
    }
}

impl Access {
    pub fn resolve(email: Option<&str>, profile: Option<&Profile>, admin_emails: &[String]) -> Self {
        let Some(email) = email else {
            return Self::Anonymous;
        };

        if profile.is_some_and(|p| p.is_admin) || is_allowlisted(email, admin_emails) {
            Self::Admin
        } else {
            Self::Member
        }
    }

    pub fn check(self, required: Access) -> Result<(), Denial> {
        if self >= required {
            return Ok(());
        }

        match self {
            Self::Anonymous => Err(Denial::SignInRequired {
                admin_area: required == Self::Admin,
            }),
            _ => Err(Denial::AdminRequired),
        }
    }

    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

pub fn is_allowlisted(email: &str, admin_emails: &[String]) -> bool {
    let email = email.trim();
    !email.is_empty()
        && admin_emails
            .iter()
            .any(|allowed| allowed.trim().eq_ignore_ascii_case(email))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn profile(is_admin: bool) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            name: "Sarah".into(),
            email: "sarah@example.com".into(),
            phone: "5550001111".into(),
            is_admin,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn no_session_is_anonymous() {
        let allow = vec!["sarah@example.com".to_string()];
        assert_eq!(Access::resolve(None, None, &allow), Access::Anonymous);
        assert_eq!(
            Access::resolve(None, Some(&profile(true)), &allow),
            Access::Anonymous
        );
    }

    #[test]
    fn profile_flag_grants_admin() {
        let p = profile(true);
        assert_eq!(
            Access::resolve(Some("sarah@example.com"), Some(&p), &[]),
            Access::Admin
        );
    }

    #[test]
    fn allowlist_grants_admin_case_insensitively() {
        let allow = vec![" Pastor@Example.com ".to_string()];
        assert_eq!(
            Access::resolve(Some("pastor@example.com"), None, &allow),
            Access::Admin
        );
    }

    #[test]
    fn valid_session_alone_is_only_member() {
        let p = profile(false);
        assert_eq!(
            Access::resolve(Some("sarah@example.com"), Some(&p), &[]),
            Access::Member
        );
        assert_eq!(
            Access::resolve(Some("sarah@example.com"), None, &[]),
            Access::Member
        );
    }

    #[test]
    fn check_orders_levels() {
        assert!(Access::Admin.check(Access::Member).is_ok());
        assert!(Access::Member.check(Access::Member).is_ok());
        assert!(Access::Anonymous.check(Access::Anonymous).is_ok());
        assert_eq!(
            Access::Member.check(Access::Admin),
            Err(Denial::AdminRequired)
        );
        assert_eq!(
            Access::Anonymous.check(Access::Member),
            Err(Denial::SignInRequired { admin_area: false })
        );
        assert_eq!(
            Access::Anonymous.check(Access::Admin),
            Err(Denial::SignInRequired { admin_area: true })
        );
    }

    #[test]
    fn denials_redirect_to_the_right_page() {
        assert_eq!(
            Denial::SignInRequired { admin_area: true }.redirect_target(),
            "/admin/login"
        );
        assert_eq!(
            Denial::SignInRequired { admin_area: false }.redirect_target(),
            "/login?error=signin"
        );
        assert_eq!(Denial::AdminRequired.redirect_target(), "/?error=admin");
    }

    #[test]
    fn empty_email_is_never_allowlisted() {
        assert!(!is_allowlisted("  ", &["".to_string()]));
    }
}
