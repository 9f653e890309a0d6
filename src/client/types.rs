use serde::{Deserialize, Serialize};

/// A record owned by the remote service. Never mutated locally; the whole
/// list is replaced on every successful fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque identifier assigned by the service.
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub active: bool,
}

/// Draft record submitted to the collection endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

/// Acknowledgement envelope the service answers writes with. The service
/// never echoes the created record, so this is all a caller gets.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateAck {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsersEnvelope {
    pub data: UsersData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsersData {
    pub users: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub data: User,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageEnvelope {
    pub message: String,
}
