use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

pub mod client;
pub mod constants;
pub mod form;

pub use client::{Gateway, GatewayError, HttpGateway};
pub use form::{Field, Form, Msg, Outbound, Submission};

/// Target network. Only changes the endpoint path and the transaction label.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mocha,
    BlockspaceRace,
    Arabica,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Mocha, Network::BlockspaceRace, Network::Arabica];

    /// Value used on the command line and in serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mocha => "mocha",
            Network::BlockspaceRace => "blockspacerace",
            Network::Arabica => "arabica",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Network::Mocha => "Mocha",
            Network::BlockspaceRace => "Blockspace Race",
            Network::Arabica => "Arabica",
        }
    }

    /// Gateway path the submission is POSTed to.
    pub fn submit_path(&self) -> &'static str {
        match self {
            Network::BlockspaceRace => "submit_pfb",
            _ => "submit_pfd",
        }
    }

    /// "PFB" (Pay For Blob) on blockspacerace, "PFD" (Pay For Data) elsewhere.
    pub fn tx_kind(&self) -> &'static str {
        match self {
            Network::BlockspaceRace => "PFB",
            _ => "PFD",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Network::Mocha => Network::BlockspaceRace,
            Network::BlockspaceRace => Network::Arabica,
            Network::Arabica => Network::Mocha,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Network::Mocha => Network::Arabica,
            Network::BlockspaceRace => Network::Mocha,
            Network::Arabica => Network::BlockspaceRace,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown network `{0}` (expected mocha, blockspacerace or arabica)")]
pub struct ParseNetworkError(pub String);

impl FromStr for Network {
    type Err = ParseNetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|n| n.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseNetworkError(s.to_string()))
    }
}

/// Body POSTed to the node gateway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub namespace_id: String,
    pub data: String,
    pub gas_limit: u64,
    pub fee: u64,
}

impl SubmitRequest {
    /// Request with the fixed gas limit and fee.
    pub fn new(namespace_id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            namespace_id: namespace_id.into(),
            data: data.into(),
            gas_limit: constants::GAS_LIMIT,
            fee: constants::FEE,
        }
    }
}

/// Fields of the gateway's transaction response we care about. Anything else the
/// node sends back is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub height: u64,
    pub txhash: String,
}
