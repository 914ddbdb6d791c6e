use thiserror::Error;

#[derive(Error, Debug)]
pub enum CampaignFlowError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Campaign not found: {0}")]
    NotFound(String),

    #[error("External service error ({service}): {message}")]
    ExternalService { service: String, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl CampaignFlowError {
    pub fn external(service: &str, message: impl std::fmt::Display) -> Self {
        CampaignFlowError::ExternalService {
            service: service.to_string(),
            message: message.to_string(),
        }
    }
}
