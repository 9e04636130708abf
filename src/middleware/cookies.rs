//! Cookie jar: inbound parsing and pending outbound cookies.

use http::header::COOKIE;

use crate::core::cookie::parse_cookie_header;
use crate::core::{Context, Cookie};
use crate::part::{map, Part};

/// Parse every inbound `Cookie` header and store the pairs on the context.
///
/// Values are percent-decoded. Order follows the headers, then the pairs
/// within each header.
pub fn read_cookies() -> impl Part {
    map(|ctx: Context| {
        let cookies: Vec<(String, String)> = ctx
            .request()
            .headers()
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(parse_cookie_header)
            .collect();
        ctx.with_cookies(cookies)
    })
}

/// Queue one `Set-Cookie` directive, replacing any pending cookie of the
/// same name.
pub fn set_cookie(cookie: Cookie) -> impl Part {
    let name = cookie.encoded_name();
    let directive = cookie.to_directive();
    map(move |ctx: Context| ctx.with_pending_cookie(name.clone(), directive.clone()))
}
