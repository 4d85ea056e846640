//!  EAN Hotel Agent
//!
//!  Copyright (C) 2026  The ean-hotel-agent authors
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Request Signer
//!
//! Side-effect free construction of the authenticated parameter set sent on
//! every EAN call. The `sig` parameter is an MD5 hex digest over
//! `apiKey + secret + unix_seconds`; the timestamp itself is never sent, the
//! server recomputes the digest within its own tolerance window, so the
//! caller's wall clock has to be accurate.

use crate::hotels_session::SearchSession;

/// Fixed account-identifying parameters. These never vary per call.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub cid: String,
    pub api_key: String,
    pub secret: String,
    pub locale: String,
    pub currency_code: String,
}

impl Credentials {
    pub fn new(
        cid: impl Into<String>,
        api_key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            cid: cid.into(),
            api_key: api_key.into(),
            secret: secret.into(),
            // https://developer.ean.com/general-info/hotel-language-options/
            locale: "en_US".to_string(),
            currency_code: "USD".to_string(),
        }
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn currency_code(mut self, currency_code: impl Into<String>) -> Self {
        self.currency_code = currency_code.into();
        self
    }
}

/// Fixed-width hex digest binding the API key and shared secret to one
/// wall-clock second.
pub fn signature(api_key: &str, secret: &str, unix_seconds: u64) -> String {
    format!(
        "{:x}",
        md5::compute(format!("{}{}{}", api_key, secret, unix_seconds))
    )
}

/// Appends `sig`, the sticky session identifier (when one has been issued)
/// and the fixed account parameters to a caller-supplied parameter set.
///
/// A fresh signature is computed on every call; nothing is cached.
pub(crate) fn sign_parameters(
    credentials: &Credentials,
    session: &SearchSession,
    parameters: &mut Vec<(String, String)>,
    unix_seconds: u64,
) {
    parameters.push((
        "sig".to_string(),
        signature(&credentials.api_key, &credentials.secret, unix_seconds),
    ));
    if let Some(id) = session.customer_session_id() {
        parameters.push(("customerSessionId".to_string(), id.to_string()));
    }
    parameters.push(("cid".to_string(), credentials.cid.clone()));
    parameters.push(("apiKey".to_string(), credentials.api_key.clone()));
    parameters.push(("locale".to_string(), credentials.locale.clone()));
    parameters.push(("currencyCode".to_string(), credentials.currency_code.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_matches_reference_digest() {
        // md5("key" + "secret" + "1234567890")
        assert_eq!(
            signature("key", "secret", 1234567890),
            "46d12309667288442ce8b8438fe5514c"
        );
    }

    #[test]
    fn signature_is_stable_within_one_second() {
        let a = signature("key", "secret", 1700000000);
        let b = signature("key", "secret", 1700000000);
        assert_eq!(a, b);
    }

    #[test]
    fn signature_changes_across_seconds() {
        let a = signature("key", "secret", 1700000000);
        let b = signature("key", "secret", 1700000001);
        assert_ne!(a, b);
    }

    #[test]
    fn signature_is_fixed_width_hex() {
        let sig = signature("key", "secret", 1700000000);
        assert_eq!(sig.len(), 32);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signed_parameters_carry_account_identity() {
        let credentials = Credentials::new("55505", "key", "secret").currency_code("EUR");
        let session = SearchSession::new();
        let mut parameters = vec![("hotelId".to_string(), "109496".to_string())];
        sign_parameters(&credentials, &session, &mut parameters, 1700000000);

        let keys: Vec<&str> = parameters.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["hotelId", "sig", "cid", "apiKey", "locale", "currencyCode"]
        );
        assert!(
            parameters
                .iter()
                .any(|(k, v)| k == "currencyCode" && v == "EUR")
        );
    }

    #[test]
    fn signed_parameters_attach_established_session() {
        let credentials = Credentials::new("55505", "key", "secret");
        let mut session = SearchSession::new();
        session.adopt_session_id("sess-42");
        let mut parameters = Vec::new();
        sign_parameters(&credentials, &session, &mut parameters, 1700000000);
        assert!(
            parameters
                .iter()
                .any(|(k, v)| k == "customerSessionId" && v == "sess-42")
        );
    }
}
