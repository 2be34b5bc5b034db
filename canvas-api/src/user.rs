use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::types::UserId;

/// The user the access token belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: Option<String>,
}

impl User {
    pub fn new(id: UserId, name: Option<String>) -> Self {
        Self { id, name }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Client {
    #[tracing::instrument(skip(self), err(level = "debug"))]
    pub async fn get_current_user(&self) -> Result<User> {
        let url = self.api_url("/users/self")?;
        self.get_json(url).await
    }
}
