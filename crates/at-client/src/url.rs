//! URL construction for `<base>/<table>` endpoints.

use crate::error::Result;

/// Form-encode query parameters, keeping their order.
pub fn encode_query(params: &[(String, String)]) -> Result<String> {
    serde_urlencoded::to_string(params).map_err(Into::into)
}

/// Build `<api_base>/<base_id>/<table>[?query]`.
///
/// Both path segments are percent-encoded. No `?` is appended when
/// `query` is empty.
pub fn build_url(
    api_base: &str,
    base_id: &str,
    table: &str,
    query: &[(String, String)],
) -> Result<String> {
    let mut url = format!(
        "{}/{}/{}",
        api_base.trim_end_matches('/'),
        urlencoding::encode(base_id),
        urlencoding::encode(table)
    );
    if !query.is_empty() {
        url.push('?');
        url.push_str(&encode_query(query)?);
    }
    Ok(url)
}
