//! Cookie encoding and Set-Cookie directive building.

use std::time::{Duration, SystemTime};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped in cookie names and values.
///
/// Everything outside RFC 6265 `cookie-octet` plus `%` itself, so that the
/// encoding is reversible.
const COOKIE_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b',')
    .add(b';')
    .add(b'=')
    .add(b'\\');

/// Percent-encode a cookie name or value.
#[inline]
pub fn encode(s: &str) -> String {
    utf8_percent_encode(s, COOKIE_ESCAPE).to_string()
}

/// Percent-decode a cookie name or value (lossy on invalid UTF-8).
#[inline]
pub fn decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

/// Parse one raw `Cookie` header into decoded pairs, preserving order.
pub fn parse_cookie_header(raw: &str) -> Vec<(String, String)> {
    raw.split(';')
        .filter_map(|pair| {
            let pair = pair.trim();
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let value = value.trim().trim_matches('"');
            Some((decode(name), decode(value)))
        })
        .collect()
}

/// Attribute values end at `;`, so one inside the value would start a new attribute.
fn attribute_value(attribute: &str, value: String) -> Option<String> {
    if value.chars().any(|c| c == ';' || c.is_control()) {
        tracing::warn!(attribute, "cookie attribute value rejected");
        return None;
    }
    Some(value)
}

/// When a cookie expires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expiration {
    /// Rendered as `Expires=<IMF-fixdate>`.
    At(SystemTime),
    /// Rendered as `Max-Age=<seconds>`.
    MaxAge(Duration),
}

/// `SameSite` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Outbound cookie description.
///
/// ```rust,ignore
/// let cookie = Cookie::new("session", "abc")
///     .path("/")
///     .http_only(true)
///     .expires(Expiration::MaxAge(Duration::from_secs(3600)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: String,
    expiration: Option<Expiration>,
    path: Option<String>,
    domain: Option<String>,
    secure: bool,
    http_only: bool,
    same_site: Option<SameSite>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expiration: None,
            path: None,
            domain: None,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }

    pub fn expires(mut self, expiration: Expiration) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Set `Path`. A value containing `;` or a control character is
    /// dropped with a warning.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = attribute_value("Path", path.into());
        self
    }

    /// Set `Domain`, with the same restriction as [`Cookie::path`].
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = attribute_value("Domain", domain.into());
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Percent-encoded name, the key used in the pending map.
    pub fn encoded_name(&self) -> String {
        encode(&self.name)
    }

    /// Render the `Set-Cookie` header value.
    pub fn to_directive(&self) -> String {
        let mut out = format!("{}={}", encode(&self.name), encode(&self.value));

        match self.expiration {
            Some(Expiration::At(time)) => {
                out.push_str("; Expires=");
                out.push_str(&crate::time::http_date(time));
            }
            Some(Expiration::MaxAge(age)) => {
                out.push_str("; Max-Age=");
                out.push_str(&age.as_secs().to_string());
            }
            None => {}
        }
        if let Some(ref path) = self.path {
            out.push_str("; Path=");
            out.push_str(path);
        }
        if let Some(ref domain) = self.domain {
            out.push_str("; Domain=");
            out.push_str(domain);
        }
        if self.secure {
            out.push_str("; Secure");
        }
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        if let Some(same_site) = self.same_site {
            out.push_str("; SameSite=");
            out.push_str(same_site.as_str());
        }
        out
    }
}
