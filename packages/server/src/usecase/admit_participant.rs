//! UseCase: 接続受付（アドミッション）
//!
//! Validates the bearer token through the external collaborator and the
//! meeting id from the request path. Runs before any transport upgrade, so
//! a rejected request never creates connection state.

use std::sync::Arc;

use crate::domain::{DisplayName, MeetingId, Participant, TokenValidator};

use super::error::AdmissionError;

/// Identity and scope of an admitted connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub participant: Participant,
    pub meeting_id: MeetingId,
}

/// 接続受付のユースケース
pub struct AdmitParticipantUseCase {
    token_validator: Arc<dyn TokenValidator>,
}

impl AdmitParticipantUseCase {
    pub fn new(token_validator: Arc<dyn TokenValidator>) -> Self {
        Self { token_validator }
    }

    /// 接続受付を実行
    ///
    /// # Arguments
    ///
    /// * `meeting_id` - Raw meeting id from the request path
    /// * `token` - Bearer token from the query string, if any
    ///
    /// # Returns
    ///
    /// * `Ok(Admission)` - The token is valid and the meeting id well-formed
    /// * `Err(AdmissionError)` - Rejected; the caller must not upgrade
    pub async fn execute(
        &self,
        meeting_id: String,
        token: Option<String>,
    ) -> Result<Admission, AdmissionError> {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or(AdmissionError::MissingToken)?;

        let user = self.token_validator.validate(&token).await?;

        let meeting_id = MeetingId::new(meeting_id).map_err(AdmissionError::InvalidMeetingId)?;

        let display_name = if user.display_name.trim().is_empty() {
            DisplayName::from_user_id(&user.user_id)
        } else {
            DisplayName::new(user.display_name).map_err(AdmissionError::InvalidDisplayName)?
        };

        Ok(Admission {
            participant: Participant::new(user.user_id, display_name),
            meeting_id,
        })
    }
}
