use url::Url;

use super::TransportError;

/// Append percent-encoded path segments and query pairs to `base`.
pub fn endpoint_url(
    base: &str,
    segments: &[&str],
    query: &[(&str, String)],
) -> Result<String, TransportError> {
    let mut url = Url::parse(base).map_err(|_| TransportError::InvalidBaseUrl {
        value: base.to_owned(),
    })?;

    url.path_segments_mut()
        .map_err(|_| TransportError::InvalidBaseUrl {
            value: base.to_owned(),
        })?
        .pop_if_empty()
        .extend(segments);

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }

    Ok(url.into())
}

/// Last non-empty path segment of a `resourceURL`.
pub fn id_from_resource_url(resource_url: &str) -> Option<&str> {
    resource_url
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .map(str::trim)
        .filter(|id| !id.is_empty())
}
