//! Shared application state.

use std::sync::Arc;

use crate::{
    config::ConnectionSettings,
    usecase::{
        AdmitParticipantUseCase, ConnectParticipantUseCase, DisconnectParticipantUseCase,
        GetParticipantsUseCase, RelaySignalUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// AdmitParticipantUseCase（接続受付のユースケース）
    pub admit_participant_usecase: Arc<AdmitParticipantUseCase>,
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// RelaySignalUseCase（メッセージ中継のユースケース）
    pub relay_signal_usecase: Arc<RelaySignalUseCase>,
    /// GetParticipantsUseCase（参加者一覧取得のユースケース）
    pub get_participants_usecase: Arc<GetParticipantsUseCase>,
    /// Transport limits applied to every connection
    pub connection_settings: ConnectionSettings,
}
