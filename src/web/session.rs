use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::erx::{Erx, ResultE};
use crate::web::cookie::CookieJar;
use crate::web::url::segment;

pub const ROLE_ADMIN: &str = "admin";

/// The signed-in user as stored in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub is_logged_in: bool,
    #[serde(default)]
    pub token: String,
}

impl Session {
    /// Parse the JSON cookie value. A value without a token is no session.
    pub fn from_cookie_value(value: &str) -> ResultE<Session> {
        let session: Session = serde_json::from_str(value)
            .map_err(|e| Erx::auth(&format!("invalid session cookie: {}", e)))?;
        if session.token.trim().is_empty() {
            return Err(Erx::auth("token not found in session cookie"));
        }
        Ok(session)
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// `Set-Cookie` value storing this session under `cookie`.
    pub fn set_cookie(&self, cookie: &str, max_age_days: u32) -> ResultE<String> {
        let value = serde_json::to_string(self)?;
        let max_age = u64::from(max_age_days) * 24 * 60 * 60;
        Ok(format!("{}={}; Path=/; Max-Age={}", cookie, segment(&value), max_age))
    }

    /// `Set-Cookie` value that removes the session.
    pub fn clear_cookie(cookie: &str) -> String {
        format!("{}=; Path=/; Max-Age=0", cookie)
    }
}

/// Accessor for the current session, injected into the fetcher.
pub trait SessionSource: Send + Sync {
    fn session(&self) -> Option<Session>;
}

/// Never signed in.
pub struct NoSession;

impl SessionSource for NoSession {
    fn session(&self) -> Option<Session> {
        None
    }
}

/// A fixed session, mostly for tests and server side rendering.
pub struct StaticSession(pub Session);

impl SessionSource for StaticSession {
    fn session(&self) -> Option<Session> {
        Some(self.0.clone())
    }
}

/// Session read from a `Cookie` header that can be replaced on login/logout.
pub struct CookieSession {
    cookie: String,
    header: RwLock<String>,
}

impl CookieSession {
    pub fn new(cookie: &str, header: &str) -> Self {
        Self { cookie: cookie.to_string(), header: RwLock::new(header.to_string()) }
    }

    /// Uses the cookie name from the settings.
    pub fn from_header(header: &str) -> Self {
        Self::new(&crate::conf::settings_snapshot().session.cookie, header)
    }

    pub fn replace(&self, header: &str) {
        match self.header.write() {
            Ok(mut guard) => *guard = header.to_string(),
            Err(poisoned) => *poisoned.into_inner() = header.to_string(),
        }
    }

    /// Store `session` as if the browser had accepted the login cookie.
    pub fn save(&self, session: &Session) -> ResultE<()> {
        let value = serde_json::to_string(session)?;
        self.replace(&format!("{}={}", self.cookie, segment(&value)));
        Ok(())
    }

    pub fn remove(&self) {
        self.replace("");
    }
}

impl SessionSource for CookieSession {
    fn session(&self) -> Option<Session> {
        let header = match self.header.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };

        let cookie = CookieJar::parse(&header).get(&self.cookie)?;
        match Session::from_cookie_value(cookie.value()) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("ignoring session cookie {}: {}", self.cookie, e.message());
                None
            },
        }
    }
}

impl<T: SessionSource + ?Sized> SessionSource for Arc<T> {
    fn session(&self) -> Option<Session> {
        (**self).session()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Session {
        Session {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: ROLE_ADMIN.into(),
            is_logged_in: true,
            token: "tok-1".into(),
        }
    }

    #[test]
    fn test_from_cookie_value() {
        let value = r#"{"name":"Ada","role":"admin","isLoggedIn":true,"token":"abc"}"#;
        let s = Session::from_cookie_value(value).unwrap();
        assert!(s.is_admin());
        assert!(s.is_logged_in);
        assert_eq!(s.bearer(), "Bearer abc");
    }

    #[test]
    fn test_rejects_bad_cookie() {
        assert!(Session::from_cookie_value("not json").unwrap_err().is_auth());
        assert!(Session::from_cookie_value(r#"{"name":"Ada"}"#).unwrap_err().is_auth());
    }

    #[test]
    fn test_cookie_session_roundtrip() {
        let source = CookieSession::new("_EduGlobal_AUTH_KEY_", "theme=dark");
        assert!(source.session().is_none());

        source.save(&admin()).unwrap();
        assert_eq!(source.session(), Some(admin()));

        source.remove();
        assert!(source.session().is_none());
    }

    #[test]
    fn test_garbled_cookie_is_no_session() {
        let source = CookieSession::new("_EduGlobal_AUTH_KEY_", "_EduGlobal_AUTH_KEY_=%7Bbroken");
        assert!(source.session().is_none());
    }

    #[test]
    fn test_set_cookie() {
        let header = admin().set_cookie("_EduGlobal_AUTH_KEY_", 13).unwrap();
        assert!(header.starts_with("_EduGlobal_AUTH_KEY_=%7B"));
        assert!(header.ends_with("; Path=/; Max-Age=1123200"));
        assert_eq!(Session::clear_cookie("k"), "k=; Path=/; Max-Age=0");
    }
}
