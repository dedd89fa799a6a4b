/// Layouted: predefined layout helpers for error codes
/// ResultE<T> = Result<T, Erx>;
/// ResultEX = ResultE<()>;
/// fn smp<T: ToString>(error: T) -> Erx
/// fn amp<T: ToString>(additional: &str) -> impl Fn(T) -> Erx
use crate::conf;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt::Display;

lazy_static! {
    static ref APP_SHORT: String = conf::settings_snapshot().short;
}

/// Zero
pub static LAYOUTED_C_ZERO: &str = "0000";

/// ResultE<T> = Result<T, Erx>;
pub type ResultE<T> = Result<T, Erx>;

/// ResultEX = ResultE<()>;
pub type ResultEX = ResultE<()>;

/// Layouted: some predefined code builders
pub struct Layouted;

pub fn describe_error(e: &dyn std::error::Error) -> String {
    let mut description = e.to_string();
    let mut current = e.source();
    while let Some(source) = current {
        description.push_str(&format!("\nCaused by: {}", source));
        current = source.source();
    }
    description
}

/// emp: error message processor
///
/// Converts any `std::error::Error` into an [`Erx`] in the network domain,
/// keeping the whole cause chain under the `ORIGIN` extra key.
/// Most errors reaching this point come out of reqwest.
pub fn emp<T: std::error::Error>(error: T) -> Erx {
    let extra = vec![(String::from("ORIGIN"), describe_error(&error))];
    let message = error.to_string();
    Erx { code: Layouted::network("TRAN", "0001"), message, extra }
}

/// smp: simple convert T: ToString to Erx
pub fn smp<T: ToString>(error: T) -> Erx {
    Erx { code: Default::default(), message: error.to_string(), extra: Vec::new() }
}

/// amp: return a function that convert T: ToString to Erx,
/// prefixing the message with `additional`
///
/// # Example
/// ```
/// let to_erx = eduglobal::erx::amp("load categories");
/// let error = to_erx("connection reset");
/// assert_eq!(error.message(), "load categories : connection reset");
/// ```
pub fn amp<T: ToString>(additional: &str) -> impl Fn(T) -> Erx {
    let additional = additional.to_string();
    move |err: T| Erx {
        code: Default::default(),
        message: format!("{} : {}", additional, err.to_string()),
        extra: Vec::new(),
    }
}

/// Predefined Layouted domain with length 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreL4 {
    /// Authentication: missing or invalid session
    AUTH,
    /// Network: transport failures and non-success statuses
    NETW,
    /// Partial: a degraded sub-fetch
    PART,
    /// Validation: rejected input on writes
    VALD,
    /// Decode: unexpected response shape
    DECO,
    /// Upload: media upload failures
    UPLD,
    /// Config
    CONF,
    /// Undefined
    UNDF,
}

impl PreL4 {
    pub fn four(&self) -> &'static str {
        match self {
            PreL4::AUTH => "AUTH",
            PreL4::NETW => "NETW",
            PreL4::PART => "PART",
            PreL4::VALD => "VALD",
            PreL4::DECO => "DECO",
            PreL4::UPLD => "UPLD",
            PreL4::CONF => "CONF",
            PreL4::UNDF => "UNDF",
        }
    }

    pub fn parse(s: &str) -> Option<PreL4> {
        match s.to_uppercase().as_str() {
            "AUTH" => Some(PreL4::AUTH),
            "NETW" => Some(PreL4::NETW),
            "PART" => Some(PreL4::PART),
            "VALD" => Some(PreL4::VALD),
            "DECO" => Some(PreL4::DECO),
            "UPLD" => Some(PreL4::UPLD),
            "CONF" => Some(PreL4::CONF),
            "UNDF" => Some(PreL4::UNDF),
            _ => None,
        }
    }

    pub fn layoutc(&self, category: &str, detail: &str) -> LayoutedC {
        LayoutedC::new(self.four(), category, detail)
    }
}

impl Display for PreL4 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.four())
    }
}

impl From<&str> for PreL4 {
    fn from(s: &str) -> Self {
        PreL4::parse(s).unwrap_or(PreL4::UNDF)
    }
}

impl From<PreL4> for String {
    fn from(value: PreL4) -> Self {
        value.four().to_string()
    }
}

impl Layouted {
    pub fn auth(category: &str, detail: &str) -> LayoutedC {
        PreL4::AUTH.layoutc(category, detail)
    }

    pub fn network(category: &str, detail: &str) -> LayoutedC {
        PreL4::NETW.layoutc(category, detail)
    }

    pub fn partial(category: &str, detail: &str) -> LayoutedC {
        PreL4::PART.layoutc(category, detail)
    }

    pub fn validation(category: &str, detail: &str) -> LayoutedC {
        PreL4::VALD.layoutc(category, detail)
    }

    pub fn decode(category: &str, detail: &str) -> LayoutedC {
        PreL4::DECO.layoutc(category, detail)
    }

    pub fn upload(category: &str, detail: &str) -> LayoutedC {
        PreL4::UPLD.layoutc(category, detail)
    }

    pub fn config(category: &str, detail: &str) -> LayoutedC {
        PreL4::CONF.layoutc(category, detail)
    }
}

/// Code format
/// aaaa-xxxx-yyyy-zzzz
///
///    aaaa : application short name
///    xxxx : domain, one of [`PreL4`]
///    yyyy : category inside the domain
///    zzzz : concrete error
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LayoutedC {
    pub application: String,
    pub domain: String,
    pub category: String,
    pub detail: String,
}

impl LayoutedC {
    pub fn okay() -> LayoutedC {
        LayoutedC {
            application: APP_SHORT.clone(),
            domain: LAYOUTED_C_ZERO.into(),
            category: LAYOUTED_C_ZERO.into(),
            detail: LAYOUTED_C_ZERO.into(),
        }
    }

    pub fn new(domain: &str, category: &str, detail: &str) -> LayoutedC {
        LayoutedC {
            application: APP_SHORT.clone(),
            domain: domain.into(),
            category: category.into(),
            detail: detail.into(),
        }
    }

    pub fn is_okc(&self) -> bool {
        [&self.domain, &self.category, &self.detail]
            .iter()
            .all(|part| part.chars().all(|c| c == '0'))
    }

    pub fn layout_string(&self) -> String {
        format!("{}-{}-{}-{}", self.application, self.domain, self.category, self.detail)
    }

    pub fn pre(&self) -> PreL4 {
        PreL4::from(self.domain.as_str())
    }
}

impl Default for LayoutedC {
    fn default() -> Self {
        LayoutedC {
            application: APP_SHORT.clone(),
            domain: PreL4::UNDF.into(),
            category: PreL4::UNDF.into(),
            detail: PreL4::UNDF.into(),
        }
    }
}

impl From<LayoutedC> for String {
    fn from(value: LayoutedC) -> Self {
        value.layout_string()
    }
}

impl From<String> for LayoutedC {
    fn from(value: String) -> Self {
        let mut c = LayoutedC::default();
        let mut parts = value.split('-');
        if let Some(application) = parts.next() {
            c.application = application.to_string();
        }
        if let Some(domain) = parts.next() {
            c.domain = domain.to_string();
        }
        if let Some(category) = parts.next() {
            c.category = category.to_string();
        }
        if let Some(detail) = parts.next() {
            c.detail = detail.to_string();
        }
        c
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Erx {
    code: LayoutedC,
    message: String,
    extra: Vec<(String, String)>,
}

impl Erx {
    pub fn new(message: &str) -> Erx {
        Erx { code: Default::default(), message: message.to_string(), extra: Vec::new() }
    }

    pub fn with_code(code: LayoutedC, message: &str) -> Erx {
        Erx { code, message: message.to_string(), extra: Vec::new() }
    }

    /// Session missing, unparsable or lacking the required role.
    pub fn auth(message: &str) -> Erx {
        Self::with_code(Layouted::auth("SESS", "0001"), message)
    }

    /// The backend answered 401/403.
    pub fn unauthorized(message: &str) -> Erx {
        Self::with_code(Layouted::auth("HTTP", "0401"), message)
    }

    pub fn network(message: &str) -> Erx {
        Self::with_code(Layouted::network("TRAN", "0001"), message)
    }

    /// A non-success HTTP status other than the auth and validation ones.
    pub fn status(status: u16, message: &str) -> Erx {
        let code = Layouted::network("HTTP", &format!("{:04}", status));
        let mut erx = Self::with_code(code, message);
        erx.add_extra("STATUS", &status.to_string());
        erx
    }

    /// Rejected input. `field` is empty when the error belongs to the whole form.
    pub fn validation(field: &str, message: &str) -> Erx {
        let mut erx = Self::with_code(Layouted::validation("FORM", "0001"), message);
        if !field.is_empty() {
            erx.add_extra("FIELD", field);
        }
        erx
    }

    /// A sub-fetch that failed and was replaced by a default.
    pub fn partial(what: &str, cause: &Erx) -> Erx {
        let message = format!("{} : {}", what, cause.message);
        let mut erx = Self::with_code(Layouted::partial("FETC", "0001"), &message);
        erx.add_extra("ORIGIN", &cause.code.layout_string());
        erx
    }

    pub fn is_partial(&self) -> bool {
        self.pre() == PreL4::PART
    }

    pub fn decode(message: &str) -> Erx {
        Self::with_code(Layouted::decode("JSON", "0001"), message)
    }

    pub fn upload(message: &str) -> Erx {
        Self::with_code(Layouted::upload("SEND", "0001"), message)
    }

    pub fn cancelled() -> Erx {
        Self::with_code(Layouted::upload("CNCL", "0001"), "upload cancelled")
    }

    pub fn code(&self) -> LayoutedC {
        self.code.clone()
    }

    pub fn pre(&self) -> PreL4 {
        self.code.pre()
    }

    pub fn is_auth(&self) -> bool {
        self.pre() == PreL4::AUTH
    }

    pub fn is_validation(&self) -> bool {
        self.pre() == PreL4::VALD
    }

    pub fn is_cancelled(&self) -> bool {
        self.pre() == PreL4::UPLD && self.code.category == "CNCL"
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn message_string(&self) -> String {
        self.message.clone()
    }

    pub fn description(&self) -> String {
        let mut description = self.code.layout_string();
        description.push(' ');
        description.push_str(&self.message);
        if self.extra.is_empty() {
            return description;
        }

        let pairs: Vec<String> = self.extra.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        description.push_str(" { ");
        description.push_str(&pairs.join(" ,"));
        description.push_str(" }");

        description
    }

    /// get extra
    pub fn extra(&self) -> &Vec<(String, String)> {
        &self.extra
    }

    /// get extra value, if not exists, return None
    pub fn extra_val(&self, key: &str) -> Option<String> {
        self.extra.iter().find(|e| e.0.eq(key)).map(|e| e.1.clone())
    }

    /// add extra
    /// if key exists, replace value
    pub fn add_extra(&mut self, key: &str, value: &str) -> &mut Self {
        for (k, v) in self.extra.iter_mut() {
            if *k == key {
                *v = value.to_string();
                return self;
            }
        }

        self.extra.push((key.to_string(), value.to_string()));
        self
    }

    /// get extra and convert to HashMap
    /// if have same key, the last value will be used
    pub fn extra_map(&self) -> HashMap<String, String> {
        self.extra.iter().cloned().collect()
    }
}

impl Display for Erx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::error::Error for Erx {}

impl Default for Erx {
    fn default() -> Self {
        Erx { code: Default::default(), message: Default::default(), extra: Default::default() }
    }
}

impl From<Infallible> for Erx {
    fn from(_: Infallible) -> Self {
        Erx::default()
    }
}

impl From<&str> for Erx {
    fn from(s: &str) -> Self {
        Erx::new(s)
    }
}

impl From<String> for Erx {
    fn from(s: String) -> Erx {
        Erx::new(&s)
    }
}

impl From<reqwest::Error> for Erx {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            let mut erx = Erx::decode(&error.to_string());
            erx.add_extra("ORIGIN", &describe_error(&error));
            return erx;
        }
        emp(error)
    }
}

impl From<serde_json::Error> for Erx {
    fn from(error: serde_json::Error) -> Self {
        Erx::decode(&error.to_string())
    }
}

impl From<validator::ValidationErrors> for Erx {
    /// Keeps the first failing field so the message can be shown next to it.
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<(String, String)> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (field.to_string(), message)
            })
            .collect();
        fields.sort();

        match fields.first() {
            Some((field, message)) => Erx::validation(field, message),
            None => Erx::validation("", "invalid input"),
        }
    }
}
