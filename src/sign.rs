use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::Url;

use crate::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Hex HMAC-SHA256 of the chart string, keyed by the api key. This is the
/// `sig` the service checks for signed urls.
pub fn signature(api_key: &str, chart: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(api_key.as_bytes())
        .map_err(|e| Error::Generic(e.to_string()))?;
    mac.update(chart.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Signs the `c` parameter of a chart url, adds `sig` and `accountId` and
/// drops `key`.
pub(crate) fn sign_url(mut url: Url, api_key: &str, account_id: &str) -> Result<Url> {
    let chart = url
        .query_pairs()
        .find(|(name, _)| name == "c")
        .map(|(_, value)| value.into_owned())
        .ok_or(Error::MissingChart)?;
    let sig = signature(api_key, &chart)?;

    let params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| name != "key")
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(params)
        .append_pair("sig", &sig)
        .append_pair("accountId", account_id);
    Ok(url)
}
