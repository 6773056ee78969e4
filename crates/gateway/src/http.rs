use std::env;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use assess_core::model::{
    AssessmentModuleId, AssignmentId, AssignmentReport, ExamTakerId, GroupProgress,
    ModuleProgressId,
};

use crate::contract::{GatewayError, SessionGateway};
use crate::wire::{AssignmentReportDto, GroupProgressDto};

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_token: Option<String>,
}

impl GatewayConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
        }
    }

    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("ASSESS_API_BASE_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let api_token = env::var("ASSESS_API_TOKEN").ok().filter(|t| !t.is_empty());
        Some(Self {
            base_url,
            api_token,
        })
    }
}

/// HTTP adapter for the session/reporting service.
#[derive(Clone)]
pub struct HttpSessionGateway {
    client: Client,
    config: GatewayConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateProgressRequest {
    exam_taker_id: String,
    assessment_module_id: String,
}

impl HttpSessionGateway {
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_group(response: reqwest::Response) -> Result<GroupProgress, GatewayError> {
        if response.status() == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound);
        }
        if !response.status().is_success() {
            return Err(GatewayError::Unavailable(format!(
                "session service returned {}",
                response.status()
            )));
        }
        let dto: GroupProgressDto = response.json().await?;
        Ok(dto.into_domain()?)
    }
}

#[async_trait]
impl SessionGateway for HttpSessionGateway {
    async fn fetch_group_progress(
        &self,
        exam_taker: ExamTakerId,
        assignment: AssignmentId,
    ) -> Result<GroupProgress, GatewayError> {
        let url = self.url(&format!(
            "assignments/{assignment}/takers/{exam_taker}/modules"
        ));
        let response = self.authorize(self.client.get(url)).send().await?;
        Self::decode_group(response).await
    }

    async fn create_module_progress(
        &self,
        exam_taker: ExamTakerId,
        module: AssessmentModuleId,
    ) -> Result<GroupProgress, GatewayError> {
        let payload = CreateProgressRequest {
            exam_taker_id: exam_taker.to_string(),
            assessment_module_id: module.to_string(),
        };
        let url = self.url("module-progress");
        let response = self
            .authorize(self.client.post(url))
            .json(&payload)
            .send()
            .await?;
        Self::decode_group(response).await
    }

    async fn fetch_module_progress(
        &self,
        exam_taker: ExamTakerId,
        progress: ModuleProgressId,
    ) -> Result<GroupProgress, GatewayError> {
        let url = self.url(&format!("module-progress/{progress}?examTakerId={exam_taker}"));
        let response = self.authorize(self.client.get(url)).send().await?;
        Self::decode_group(response).await
    }

    async fn fetch_assignment_report(
        &self,
        exam_taker: ExamTakerId,
        assignment: AssignmentId,
    ) -> Result<AssignmentReport, GatewayError> {
        let url = self.url(&format!(
            "assignments/{assignment}/takers/{exam_taker}/report"
        ));
        let response = self.authorize(self.client.get(url)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound);
        }
        if !response.status().is_success() {
            return Err(GatewayError::Unavailable(format!(
                "session service returned {}",
                response.status()
            )));
        }
        let dto: AssignmentReportDto = response.json().await?;
        Ok(dto.into_domain()?)
    }
}
