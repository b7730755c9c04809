// src/store.rs
use log::debug;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::config::BackendConfig;
use crate::data_types::{Record, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("the backend rejected the credentials")]
    Unauthorized,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("the backend returned {status}: {body}")]
    Backend { status: StatusCode, body: String },
}

/// An authenticated identity. Every data operation takes one explicitly;
/// there is no ambient current user.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    token: String,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    #[cfg(test)]
    pub fn fake(user: User) -> Self {
        Session {
            user,
            token: "test-token".into(),
        }
    }
}

/// Client for the hosted backend: token auth plus a JSON document database
/// with per-collection list/create/update/delete.
#[derive(Debug, Clone)]
pub struct Store {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Query object for `list`, mirroring the `{ where, orderBy, limit }` shape
/// the backend expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(rename = "where", skip_serializing_if = "Map::is_empty")]
    pub filter: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ListQuery {
    /// Scope to documents owned by the session's user. Every screen query
    /// starts here.
    pub fn owned_by(session: &Session) -> Self {
        ListQuery::default().filter("userId", session.user_id())
    }

    pub fn filter(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filter.insert(field.to_string(), value.into());
        self
    }

    pub fn order_asc(mut self, field: &str) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            direction: Direction::Asc,
        });
        self
    }

    pub fn order_desc(mut self, field: &str) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            direction: Direction::Desc,
        });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl Store {
    pub fn new(config: &BackendConfig) -> Self {
        Store {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, StoreError> {
        #[derive(Deserialize)]
        struct LoginBody {
            token: String,
            user: User,
        }

        let response = self
            .http
            .post(self.endpoint("auth/login"))
            .json(&json!({
                "projectId": self.project_id,
                "email": email,
                "password": password,
            }))
            .send()
            .await?;
        let body: LoginBody = Self::check(response).await?.json().await?;
        debug!("signed in as {}", body.user.id);
        Ok(Session {
            user: body.user,
            token: body.token,
        })
    }

    /// Re-fetch the signed-in user's profile.
    pub async fn me(&self, session: &Session) -> Result<User, StoreError> {
        let response = self
            .http
            .get(self.endpoint("auth/me"))
            .bearer_auth(&session.token)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn list<T: Record>(
        &self,
        session: &Session,
        query: ListQuery,
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .http
            .post(self.endpoint(&format!("db/{}/query", T::COLLECTION)))
            .bearer_auth(&session.token)
            .json(&query)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn create<T: Record>(&self, session: &Session, record: &T) -> Result<(), StoreError> {
        let response = self
            .http
            .post(self.endpoint(&format!("db/{}", T::COLLECTION)))
            .bearer_auth(&session.token)
            .json(record)
            .send()
            .await?;
        Self::check(response).await?;
        debug!("created {}/{}", T::COLLECTION, record.id());
        Ok(())
    }

    pub async fn update<T: Record>(
        &self,
        session: &Session,
        id: &str,
        patch: Value,
    ) -> Result<(), StoreError> {
        let response = self
            .http
            .patch(self.endpoint(&format!("db/{}/{id}", T::COLLECTION)))
            .bearer_auth(&session.token)
            .json(&patch)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn delete<T: Record>(&self, session: &Session, id: &str) -> Result<(), StoreError> {
        let response = self
            .http
            .delete(self.endpoint(&format!("db/{}/{id}", T::COLLECTION)))
            .bearer_auth(&session.token)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.base_url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else if status == StatusCode::UNAUTHORIZED {
            Err(StoreError::Unauthorized)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(StoreError::Backend { status, body })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::User;

    fn session() -> Session {
        Session::fake(User {
            id: "user_1".into(),
            email: "jane@example.com".into(),
            display_name: None,
        })
    }

    #[test]
    fn list_query_serializes_like_the_backend_expects() {
        let query = ListQuery::owned_by(&session())
            .filter("status", "scheduled")
            .order_desc("createdAt")
            .limit(5);
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "where": { "userId": "user_1", "status": "scheduled" },
                "orderBy": { "field": "createdAt", "direction": "desc" },
                "limit": 5
            })
        );
    }

    #[test]
    fn empty_query_serializes_to_an_empty_object() {
        let value = serde_json::to_value(ListQuery::default()).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn endpoints_join_without_duplicate_slashes() {
        let store = Store::new(&crate::config::BackendConfig {
            base_url: "https://api.example.com/".into(),
            project_id: "p".into(),
        });
        assert_eq!(
            store.endpoint("db/guests/query"),
            "https://api.example.com/v1/db/guests/query"
        );
    }
}
