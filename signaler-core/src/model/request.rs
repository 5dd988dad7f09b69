use crate::error::ProtocolError;
use crate::model::signaling::{CandidateArgs, SdpArgs};
use serde::Deserialize;
use serde_json::Value;

/// Methods a client may invoke on the server.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientRequest {
    Members,
    Sdp(SdpArgs),
    Candidate(CandidateArgs),
    Pong,
}

#[derive(Deserialize)]
struct RawEnvelope {
    method: String,
    #[serde(default)]
    args: Value,
}

impl ClientRequest {
    /// Decodes the method tag first, then only the args that method needs.
    pub fn decode(raw: &str) -> Result<Self, ProtocolError> {
        let envelope: RawEnvelope = serde_json::from_str(raw)?;

        match envelope.method.as_str() {
            "members" => Ok(Self::Members),
            "sdp" => Ok(Self::Sdp(serde_json::from_value(envelope.args)?)),
            "candidate" => Ok(Self::Candidate(serde_json::from_value(envelope.args)?)),
            "pong" => Ok(Self::Pong),
            _ => Err(ProtocolError::UnknownMethod(envelope.method)),
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            Self::Members => "members",
            Self::Sdp(_) => "sdp",
            Self::Candidate(_) => "candidate",
            Self::Pong => "pong",
        }
    }
}
