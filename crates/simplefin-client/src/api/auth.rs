//! Setup-token exchange.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use reqwest::StatusCode;
use url::Url;

use crate::access_url::AccessUrl;
use crate::client::{SimplefinClient, body_if_ok};
use crate::error::{DecodeError, Error, Result};

const ENDPOINT: &str = "fetch access token";

/// URL-safe alphabet, padding optional.
const SETUP_TOKEN: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Setup-token exchange client.
pub struct AuthApi {
    client: SimplefinClient,
}

impl AuthApi {
    pub(crate) fn new(client: SimplefinClient) -> Self {
        Self { client }
    }

    /// Redeem a setup token for a long-lived access URL.
    ///
    /// The token is base64 for a one-time claim URL. Claiming POSTs to it;
    /// the bridge answers with the access URL as plain text.
    ///
    /// # Errors
    ///
    /// - [`Error::Decode`] if the token is not base64 for a URL.
    /// - [`Error::SetupTokenUsed`] if the bridge answers 403.
    /// - [`Error::Api`] for any other non-200 status.
    /// - [`Error::InvalidAccessUrl`] if the returned text is not a valid access URL.
    pub async fn exchange(&self, setup_token: &str) -> Result<AccessUrl> {
        let claim_url = decode_setup_token(setup_token)?;

        let response = self.client.post_empty(claim_url).await?;
        if response.status() == StatusCode::FORBIDDEN {
            return Err(Error::SetupTokenUsed);
        }

        let body = body_if_ok(response, ENDPOINT).await?;
        let access = AccessUrl::parse(&body)?;

        tracing::info!(host = ?access.host(), "Claimed access URL");
        Ok(access)
    }
}

/// Decode a setup token into its claim URL without contacting the bridge.
pub fn decode_setup_token(setup_token: &str) -> std::result::Result<Url, DecodeError> {
    let bytes = SETUP_TOKEN.decode(setup_token.trim())?;
    let text = String::from_utf8(bytes)?;
    Url::parse(text.trim()).map_err(DecodeError::ClaimUrl)
}
