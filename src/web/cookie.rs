use std::collections::HashMap;

use crate::web::url::url_decode;

/// Cookie header parser
pub struct CookieJar {
    cookies: HashMap<String, String>,
}

impl CookieJar {
    /// parse a `Cookie` header value, `a=1; b=2`
    /// values are percent-decoded, later duplicates win
    pub fn parse(header: &str) -> Self {
        let mut cookies = HashMap::new();

        for cookie in header.split(';') {
            let cookie = cookie.trim();
            if let Some((key, value)) = cookie.split_once('=') {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                cookies.insert(key.to_string(), url_decode(value.trim()));
            }
        }

        Self { cookies }
    }

    /// get the cookie with name
    pub fn get(&self, name: &str) -> Option<Cookie> {
        self.cookies.get(name).map(|value| Cookie { name: name.to_string(), value: value.clone() })
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

/// A single decoded cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: String,
}

impl Cookie {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        let header = "theme=dark; _EduGlobal_AUTH_KEY_=%7B%22token%22%3A%22t%22%7D ;=skip; broken";
        let jar = CookieJar::parse(header);
        assert_eq!(jar.len(), 2);
        assert_eq!(jar.get("theme").unwrap().value(), "dark");
        assert_eq!(jar.get("_EduGlobal_AUTH_KEY_").unwrap().value(), "{\"token\":\"t\"}");
        assert!(jar.get("broken").is_none());
    }

    #[test]
    fn test_empty_header() {
        assert!(CookieJar::parse("").is_empty());
    }
}
