use crate::model::ids::PeerId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Every frame on the wire is `{ "method": <tag>, "args": { ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "args", rename_all = "lowercase")]
pub enum SignalMessage {
    Members(MembersArgs),
    Sdp(SdpArgs),
    Candidate(CandidateArgs),
    Ping(Empty),
    Pong(Empty),
    Exit(ExitArgs),
}

impl SignalMessage {
    pub fn members(members: Vec<PeerId>) -> Self {
        Self::Members(MembersArgs { members })
    }

    pub fn ping() -> Self {
        Self::Ping(Empty {})
    }

    pub fn pong() -> Self {
        Self::Pong(Empty {})
    }

    pub fn exit(session_key: PeerId) -> Self {
        Self::Exit(ExitArgs { session_key })
    }

    /// The `method` tag this message is sent under.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Members(_) => "members",
            Self::Sdp(_) => "sdp",
            Self::Candidate(_) => "candidate",
            Self::Ping(_) => "ping",
            Self::Pong(_) => "pong",
            Self::Exit(_) => "exit",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembersArgs {
    #[serde(default)]
    pub members: Vec<PeerId>,
}

/// Fields of a forwarded envelope's `args` that the server does not route on.
///
/// Relayed untouched, including keys the server has never heard of.
pub type Extra = Map<String, Value>;

/// Args of an `sdp` envelope. The session description itself is opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdpArgs {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub sdp: Value,
    /// Overwritten by the server with the sender's peer id.
    #[serde(default)]
    pub src: PeerId,
    pub dst: PeerId,
    #[serde(flatten)]
    pub extra: Extra,
}

impl SdpArgs {
    pub fn new(sdp: Value, dst: impl Into<PeerId>) -> Self {
        Self {
            sdp,
            src: PeerId::default(),
            dst: dst.into(),
            extra: Extra::new(),
        }
    }
}

/// Args of a `candidate` envelope. The ICE candidate itself is opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateArgs {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub candidate: Value,
    #[serde(default)]
    pub src: PeerId,
    pub dst: PeerId,
    #[serde(flatten)]
    pub extra: Extra,
}

impl CandidateArgs {
    pub fn new(candidate: Value, dst: impl Into<PeerId>) -> Self {
        Self {
            candidate,
            src: PeerId::default(),
            dst: dst.into(),
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitArgs {
    #[serde(rename = "sessionKey")]
    pub session_key: PeerId,
}
