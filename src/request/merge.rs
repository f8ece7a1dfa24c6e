use log::debug;
use url::Url;

use super::{RequestDescriptor, RequestParts, query};
use crate::template::Fatal;

/// Fold per-file contributions, in file order, into one request.
///
/// - Host strings are concatenated.
/// - Method, Backend and Body: the last non-empty value wins.
/// - Headers, Query and BackendOptions are concatenated.
/// - Config values come from the rightmost file that sets them.
///
/// Missing Host or Backend and a Host that is not a URL are position-less
/// fatals.
pub fn merge(parts: &[RequestParts]) -> Result<RequestDescriptor, Vec<Fatal>> {
    let mut host: Option<String> = None;
    let mut method = None;
    let mut backend = None;
    let mut body = None;
    let mut headers = Vec::new();
    let mut query = Vec::new();
    let mut backend_options = Vec::new();

    for part in parts {
        if let Some(h) = &part.host {
            host.get_or_insert_default().push_str(h);
        }
        if let Some(m) = part.method.as_ref().filter(|m| !m.is_empty()) {
            method = Some(m.clone());
        }
        if part.backend.is_some() {
            backend = part.backend;
        }
        if let Some(b) = part.body.as_ref().filter(|b| !b.is_empty()) {
            body = Some(b.clone());
        }
        headers.extend(part.headers.iter().cloned());
        query.extend(part.query.iter().cloned());
        backend_options.extend(part.backend_options.iter().cloned());
    }

    let mut timeout = None;
    let mut query_delimiter = None;
    for part in parts.iter().rev() {
        if timeout.is_none() {
            timeout = part.config.timeout;
        }
        if query_delimiter.is_none() {
            query_delimiter = part.config.query_delimiter.clone();
        }
        if timeout.is_some() && query_delimiter.is_some() {
            break;
        }
    }

    let mut fatals = Vec::new();
    let host = host.filter(|h| !h.is_empty());
    if host.is_none() {
        fatals.push(Fatal::global("No mandatory [Host] section found"));
    }
    if backend.is_none() {
        fatals.push(Fatal::global("No mandatory [Backend] section found"));
    }
    let (Some(host), Some(backend)) = (host, backend) else {
        return Err(fatals);
    };

    let mut url = parse_host(&host)
        .map_err(|e| vec![Fatal::global(format!("[Host] has illegal url: {host}: {e}"))])?;
    query::apply(&mut url, &query, query_delimiter.as_deref());
    debug!("merged {} file(s) into {url}", parts.len());

    Ok(RequestDescriptor {
        url,
        method,
        headers,
        query,
        body,
        backend,
        backend_options,
        timeout,
        query_delimiter,
    })
}

/// Parse a host, assuming `http://` when it has no scheme.
fn parse_host(host: &str) -> Result<Url, url::ParseError> {
    match Url::parse(host) {
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("http://{host}")),
        other => other,
    }
}
