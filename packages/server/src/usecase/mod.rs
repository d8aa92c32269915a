//! UseCase 層
//!
//! One struct per operation of the signaling core. Each use case depends
//! only on domain traits (`Arc<dyn TokenValidator>`, `Arc<dyn SignalingHub>`),
//! never on the concrete infrastructure.

pub mod admit_participant;
pub mod connect_participant;
pub mod disconnect_participant;
pub mod error;
pub mod get_participants;
pub mod relay_signal;

pub use admit_participant::{AdmitParticipantUseCase, Admission};
pub use connect_participant::{ConnectParticipantUseCase, ConnectedSession};
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{AdmissionError, ConnectError, GetParticipantsError, RelayError};
pub use get_participants::GetParticipantsUseCase;
pub use relay_signal::{RelayRequest, RelaySignalUseCase};
