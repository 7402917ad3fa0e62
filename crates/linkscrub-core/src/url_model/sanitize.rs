//! Canonical URL reconstruction from keep decisions.

use super::query::encode_component;
use super::{ParsedUrl, QueryParam};

/// Rebuilds `url` keeping only the parameters flagged `true`, in the order the
/// decisions are yielded.
///
/// An explicit port is written back, unlike a plain scheme + host + path
/// rebuild, so links to non-default ports keep working.
///
/// Scheme, host, port and the already-encoded path are copied verbatim; the
/// fragment is never emitted. A parameter without a value is written as a bare
/// `name`, an empty value as `name=`.
///
/// # Examples
///
/// - `https://shop.example/item?utm_source=ig&id=42` with nothing kept →
///   `"https://shop.example/item"`
pub fn sanitize_url<'a, I>(url: &ParsedUrl, decisions: I) -> String
where
    I: IntoIterator<Item = (&'a QueryParam, bool)>,
{
    let mut out = format!("{}://{}", url.scheme, url.host);
    if let Some(port) = url.port {
        out.push(':');
        out.push_str(&port.to_string());
    }
    out.push_str(&url.path);

    let mut first = true;
    for (param, keep) in decisions {
        if !keep {
            continue;
        }
        out.push(if first { '?' } else { '&' });
        first = false;
        out.push_str(&encode_component(&param.name));
        if let Some(value) = &param.value {
            out.push('=');
            out.push_str(&encode_component(value));
        }
    }
    out
}
