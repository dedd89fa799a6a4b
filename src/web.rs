//! Browser-side plumbing: the backend client, cookies and the session.

pub mod client;
pub mod cookie;
pub mod notice;
pub mod session;
pub mod url;

pub use client::{Client, ClientBuilder};
pub use notice::Notice;
pub use session::{CookieSession, NoSession, Session, SessionSource, StaticSession};
