//! User token settings

use serde::{Deserialize, Serialize};

use crate::client::NexusClient;
use crate::transport::{Method, Transport};
use crate::Result;

const USER_TOKENS_PATH: &str = "/service/rest/v1/security/user-tokens";

/// User token capability settings, in API shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTokenSettings {
    pub enabled: bool,
    /// Require a user token for repository authentication
    pub protect_content: bool,
    pub expiration_enabled: bool,
    pub expiration_days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenState {
    #[default]
    Present,
    Enabled,
    Absent,
    Disabled,
}

impl TokenState {
    pub fn is_enabled(&self) -> bool {
        matches!(self, TokenState::Present | TokenState::Enabled)
    }
}

impl UserTokenSettings {
    /// Desired settings for a requested state.
    pub fn desired(state: TokenState, required_for_auth: bool, expire_tokens: bool, expiration_days: u32) -> Self {
        Self {
            enabled: state.is_enabled(),
            protect_content: required_for_auth,
            expiration_enabled: expire_tokens,
            expiration_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenOutcome {
    pub changed: bool,
    pub settings: UserTokenSettings,
}

impl<T: Transport> NexusClient<T> {
    pub fn user_token_settings(&self) -> Result<UserTokenSettings> {
        let request = self.request(Method::Get, USER_TOKENS_PATH);
        self.send_expecting("get token settings", &request, &[200])?
            .json("token settings")
    }

    /// Replace the token settings, returning what the server reports back.
    pub fn update_user_token_settings(&self, settings: &UserTokenSettings) -> Result<UserTokenSettings> {
        let body = serde_json::to_vec(settings).map_err(|e| crate::Error::parse("token settings", e))?;
        let request = self.request(Method::Put, USER_TOKENS_PATH).body(body);
        let response = self.send_expecting("update token settings", &request, &[200, 204])?;
        if response.body.is_empty() {
            return Ok(*settings);
        }
        response.json("token settings")
    }
}

/// Bring the token settings to `desired`.
///
/// The settings are written only when a field differs and `check_mode` is
/// off. The outcome carries the server's settings after the call.
pub fn reconcile_user_tokens<T: Transport>(
    client: &NexusClient<T>,
    desired: &UserTokenSettings,
    check_mode: bool,
) -> Result<TokenOutcome> {
    let current = client.user_token_settings()?;
    if current == *desired {
        return Ok(TokenOutcome {
            changed: false,
            settings: current,
        });
    }

    if check_mode {
        tracing::info!("User token settings would change (check mode)");
        return Ok(TokenOutcome {
            changed: true,
            settings: current,
        });
    }

    let settings = client.update_user_token_settings(desired)?;
    tracing::info!(enabled = settings.enabled, "Updated user token settings");
    Ok(TokenOutcome { changed: true, settings })
}
