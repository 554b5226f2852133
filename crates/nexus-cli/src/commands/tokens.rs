//! Tokens command implementation

use nexus_client::{TokenState, UserTokenSettings, reconcile_user_tokens};

use crate::cli::{ConnectionArgs, TokenStateArg};
use crate::commands::{connect, print_json};
use crate::error::Result;

impl From<TokenStateArg> for TokenState {
    fn from(state: TokenStateArg) -> Self {
        match state {
            TokenStateArg::Present => TokenState::Present,
            TokenStateArg::Enabled => TokenState::Enabled,
            TokenStateArg::Absent => TokenState::Absent,
            TokenStateArg::Disabled => TokenState::Disabled,
        }
    }
}

/// Run the tokens command
pub fn run_tokens(
    connection: &ConnectionArgs,
    state: TokenStateArg,
    required_for_auth: bool,
    expire_tokens: bool,
    expiration_days: u32,
    check: bool,
) -> Result<()> {
    let client = connect(connection)?;
    let desired = UserTokenSettings::desired(state.into(), required_for_auth, expire_tokens, expiration_days);
    let outcome = reconcile_user_tokens(&client, &desired, check)?;
    print_json(&outcome)
}
