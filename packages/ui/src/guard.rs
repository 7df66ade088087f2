//! Route guard: decides, from the path alone and the current session, whether a
//! navigation may proceed.

/// Where a flow wants the app to go next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    Home,
    /// The login page; `return_url` is where to continue after logging in.
    Login { return_url: Option<String> },
    Users,
    /// A path inside the app, e.g. a preserved return URL.
    Path(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Destination),
}

pub const LOGIN_PATH: &str = "/account/login";
pub const REGISTER_PATH: &str = "/account/register";

/// Pages reachable without a session.
pub fn is_public(path: &str) -> bool {
    let path = strip_query(path);
    path == LOGIN_PATH || path == REGISTER_PATH
}

/// Check a navigation to `path`. Reads only the session flag; no I/O.
pub fn check(path: &str, authenticated: bool) -> GuardDecision {
    match (is_public(path), authenticated) {
        (false, false) => GuardDecision::Redirect(Destination::Login {
            return_url: Some(path.to_string()).filter(|p| strip_query(p) != "/"),
        }),
        (true, true) => GuardDecision::Redirect(Destination::Home),
        _ => GuardDecision::Allow,
    }
}

/// Where to go after a successful login. Only same-app paths are honoured.
pub fn after_login(return_url: Option<&str>) -> Destination {
    match return_url.map(str::trim) {
        Some(url) if is_local(url) && !is_public(url) => Destination::Path(url.to_string()),
        _ => Destination::Home,
    }
}

fn is_local(url: &str) -> bool {
    url.starts_with('/') && !url.starts_with("//") && !url.contains('\\')
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_user_is_sent_to_login_with_return_url() {
        assert_eq!(
            check("/users/edit/7", false),
            GuardDecision::Redirect(Destination::Login {
                return_url: Some("/users/edit/7".into())
            })
        );
    }

    #[test]
    fn test_home_needs_no_return_url() {
        assert_eq!(
            check("/", false),
            GuardDecision::Redirect(Destination::Login { return_url: None })
        );
    }

    #[test]
    fn test_public_pages() {
        assert_eq!(check("/account/login", false), GuardDecision::Allow);
        assert_eq!(check("/account/login?return_url=/users", false), GuardDecision::Allow);
        assert_eq!(check("/account/register", false), GuardDecision::Allow);
        assert_eq!(check("/users", true), GuardDecision::Allow);
    }

    #[test]
    fn test_signed_in_user_skips_account_pages() {
        assert_eq!(
            check("/account/register", true),
            GuardDecision::Redirect(Destination::Home)
        );
    }

    #[test]
    fn test_after_login_only_follows_local_paths() {
        assert_eq!(after_login(Some("/users")), Destination::Path("/users".into()));
        assert_eq!(after_login(Some("https://evil.example")), Destination::Home);
        assert_eq!(after_login(Some("//evil.example")), Destination::Home);
        assert_eq!(after_login(Some("/account/login")), Destination::Home);
        assert_eq!(after_login(None), Destination::Home);
    }
}
