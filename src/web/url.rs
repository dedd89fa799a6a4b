/// Join two url path
pub fn join(base: &str, other: &str) -> String {
    if other.is_empty() {
        return base.to_string();
    }

    let be = base.ends_with('/');
    let os = other.starts_with('/');
    if be && os {
        return format!("{}{}", base, &other[1..]);
    }

    if !be && !os {
        return format!("{}/{}", base, other);
    }

    format!("{}{}", base, other)
}

/// Percent encode one path segment (ids interpolated into resource paths)
pub fn segment(val: &str) -> String {
    percent_encoding::utf8_percent_encode(val, PATH_SEGMENT).to_string()
}

const PATH_SEGMENT: &percent_encoding::AsciiSet =
    &percent_encoding::NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Url decode, invalid utf-8 decodes to empty
pub fn url_decode(val: &str) -> String {
    percent_encoding::percent_decode(val.as_bytes()).decode_utf8().unwrap_or_default().into()
}

/// Append query pairs to a path or url, skipping empty values
pub fn with_query(path: &str, pairs: &[(String, String)]) -> String {
    let pairs: Vec<&(String, String)> = pairs.iter().filter(|(_, v)| !v.is_empty()).collect();
    if pairs.is_empty() {
        return path.to_string();
    }

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (k, v) in pairs {
        serializer.append_pair(k, v);
    }

    let sep = if path.contains('?') { '&' } else { '?' };
    format!("{}{}{}", path, sep, serializer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join() {
        assert_eq!(join("http://h/api", "courses"), "http://h/api/courses");
        assert_eq!(join("http://h/api/", "/courses"), "http://h/api/courses");
        assert_eq!(join("http://h/api/", "courses"), "http://h/api/courses");
        assert_eq!(join("http://h/api", ""), "http://h/api");
    }

    #[test]
    fn test_with_query() {
        let q = vec![
            ("search".to_string(), "ada l".to_string()),
            ("empty".to_string(), String::new()),
        ];
        assert_eq!(with_query("/total", &q), "/total?search=ada+l");
        assert_eq!(with_query("/total?x=1", &q), "/total?x=1&search=ada+l");
        assert_eq!(with_query("/total", &[]), "/total");
    }

    #[test]
    fn test_encode_decode() {
        assert_eq!(segment("65f0a1/x y"), "65f0a1%2Fx%20y");
        assert_eq!(url_decode("%7B%22a%22%3A1%7D"), "{\"a\":1}");
    }
}
