//! `reqwest` adapter for the ideas/users REST endpoints.

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use scholarshare_domain::id::{IdeaId, UserId};
use scholarshare_domain::idea::{FileUpload, Idea, NewIdea, UserSummary};
use scholarshare_domain::report::{Achievements, Report};
use scholarshare_domain::user::{User, UserType};

use crate::domain::ports::{IdeaApi, UserApi};
use crate::domain::types::{Credentials, RegisterUser};
use crate::error::ClientError;

/// REST client implementing [`IdeaApi`] and [`UserApi`].
#[derive(Clone)]
pub struct RestApi {
    http: reqwest::Client,
    base_url: String,
}

impl RestApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(anyhow::Error::from)?;
        decode(response).await
    }
}

/// Map a response to a decoded body or a client error. 404 is a definitive
/// answer, not a transport failure, so it must never enter the retry loop.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound);
    }
    if !status.is_success() {
        let url = response.url().clone();
        return Err(ClientError::Transport(anyhow::anyhow!(
            "unexpected status {status} from {url}"
        )));
    }
    response.json().await.map_err(|e| anyhow::Error::from(e).into())
}

impl IdeaApi for RestApi {
    async fn fetch_ideas(&self) -> Result<Vec<Idea>, ClientError> {
        self.get_json("ideas").await
    }

    async fn create_idea(
        &self,
        author: &UserSummary,
        draft: &NewIdea,
        files: &[FileUpload],
    ) -> Result<Idea, ClientError> {
        let mut form = reqwest::multipart::Form::new()
            .text("title", draft.title.clone())
            .text("description", draft.description.clone())
            .text(
                "user",
                serde_json::to_string(author).map_err(anyhow::Error::from)?,
            );
        for file in files {
            let part = reqwest::multipart::Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.content_type)
                .map_err(anyhow::Error::from)?;
            form = form.part("files", part);
        }
        let response = self
            .http
            .post(self.url("ideas"))
            .multipart(form)
            .send()
            .await
            .map_err(anyhow::Error::from)?;
        decode(response).await
    }

    async fn like_idea(&self, idea_id: &IdeaId, user_id: &UserId) -> Result<Idea, ClientError> {
        let response = self
            .http
            .post(self.url(&format!("ideas/{idea_id}/like")))
            .json(&json!({ "userId": user_id }))
            .send()
            .await
            .map_err(anyhow::Error::from)?;
        decode(response).await
    }

    async fn rate_idea(
        &self,
        idea_id: &IdeaId,
        user_id: &UserId,
        rating: u8,
    ) -> Result<Idea, ClientError> {
        let response = self
            .http
            .post(self.url(&format!("ideas/{idea_id}/rate")))
            .json(&json!({ "userId": user_id, "rating": rating }))
            .send()
            .await
            .map_err(anyhow::Error::from)?;
        decode(response).await
    }

    async fn fetch_user_ideas(&self, user_id: &UserId) -> Result<Vec<Idea>, ClientError> {
        self.get_json(&format!("users/{user_id}/ideas")).await
    }

    async fn fetch_report(&self) -> Result<Report, ClientError> {
        self.get_json("reports").await
    }

    async fn fetch_achievements(&self, user_id: &UserId) -> Result<Achievements, ClientError> {
        self.get_json(&format!("users/achievements/{user_id}")).await
    }
}

#[derive(Deserialize)]
struct ExistenceResponse {
    exists: bool,
}

impl UserApi for RestApi {
    async fn register(&self, new_user: &RegisterUser) -> Result<User, ClientError> {
        let response = self
            .http
            .post(self.url("users/register"))
            .json(new_user)
            .send()
            .await
            .map_err(anyhow::Error::from)?;
        if response.status() == StatusCode::CONFLICT {
            return Err(ClientError::EmailTaken);
        }
        decode(response).await
    }

    async fn check_existence(&self, email: &str) -> Result<bool, ClientError> {
        let response = self
            .http
            .post(self.url("users/checkExistence"))
            .json(&json!({ "email": email }))
            .send()
            .await
            .map_err(anyhow::Error::from)?;
        let body: ExistenceResponse = decode(response).await?;
        Ok(body.exists)
    }

    async fn change_user_type(
        &self,
        user_id: &UserId,
        new_type: UserType,
    ) -> Result<User, ClientError> {
        let response = self
            .http
            .post(self.url(&format!("users/change-type/{user_id}")))
            .json(&json!({ "type": new_type }))
            .send()
            .await
            .map_err(anyhow::Error::from)?;
        decode(response).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<User, ClientError> {
        let response = self
            .http
            .post(self.url("users/login"))
            .json(credentials)
            .send()
            .await
            .map_err(anyhow::Error::from)?;
        decode(response).await
    }

    async fn fetch_users(&self) -> Result<Vec<User>, ClientError> {
        self.get_json("users").await
    }
}
