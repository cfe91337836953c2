use std::fmt;

use crate::services::http::ApiError;

/// User-facing actions, each with one generic failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LoadSlots,
    LoadProfessionals,
    LoadServices,
    LoadCategories,
    CreateAppointment,
    UpdateAppointment,
    CancelAppointment,
    LoadNextAppointment,
    LoadRecentAppointments,
    LoadProfile,
    SaveProfile,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::LoadSlots => "load_slots",
            Action::LoadProfessionals => "load_professionals",
            Action::LoadServices => "load_services",
            Action::LoadCategories => "load_categories",
            Action::CreateAppointment => "create_appointment",
            Action::UpdateAppointment => "update_appointment",
            Action::CancelAppointment => "cancel_appointment",
            Action::LoadNextAppointment => "load_next_appointment",
            Action::LoadRecentAppointments => "load_recent_appointments",
            Action::LoadProfile => "load_profile",
            Action::SaveProfile => "save_profile",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Action::LoadSlots => "Nao foi possivel carregar os horarios.",
            Action::LoadProfessionals => "Nao foi possivel carregar os profissionais.",
            Action::LoadServices => "Nao foi possivel carregar os servicos.",
            Action::LoadCategories => "Nao foi possivel carregar as categorias.",
            Action::CreateAppointment => "Nao foi possivel confirmar o agendamento.",
            Action::UpdateAppointment => "Nao foi possivel atualizar o agendamento.",
            Action::CancelAppointment => "Nao foi possivel cancelar o agendamento.",
            Action::LoadNextAppointment => "Nao foi possivel carregar o proximo agendamento.",
            Action::LoadRecentAppointments => "Nao foi possivel carregar os agendamentos.",
            Action::LoadProfile => "Nao foi possivel carregar o perfil.",
            Action::SaveProfile => "Nao foi possivel salvar as alteracoes.",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("booking is incomplete: service, date, time and professional are required")]
    IncompleteBooking,

    #[error("edit is incomplete: service, time and professional are required")]
    IncompleteEdit,

    #[error("no change selected")]
    NoChanges,

    #[error("invalid date or time: {0}")]
    InvalidDateTime(String),

    #[error("selection not available: {0}")]
    UnavailableSelection(String),

    #[error("appointment has no service to edit")]
    MissingService,

    #[error("no upcoming appointment")]
    NoAppointment,

    #[error("invalid search: {0}")]
    InvalidSearch(String),

    #[error("session expired")]
    SessionExpired,

    #[error("{action} failed: {source}")]
    Request {
        action: Action,
        #[source]
        source: ApiError,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl BookingError {
    pub fn request(action: Action, source: ApiError) -> Self {
        BookingError::Request { action, source }
    }

    /// Short pt-BR message shown to the customer. Never exposes status codes.
    pub fn user_message(&self) -> String {
        match self {
            BookingError::IncompleteBooking => "Complete o agendamento antes de confirmar.".into(),
            BookingError::IncompleteEdit => "Complete todas as etapas antes de alterar.".into(),
            BookingError::NoChanges => "Nenhuma alteracao foi selecionada.".into(),
            BookingError::InvalidDateTime(_) => "Data ou horario invalidos.".into(),
            BookingError::UnavailableSelection(_) => "Opcao indisponivel. Escolha outra.".into(),
            BookingError::MissingService => {
                "Servico nao encontrado para editar o agendamento.".into()
            }
            BookingError::NoAppointment => "Nenhum agendamento encontrado.".into(),
            BookingError::InvalidSearch(msg) => msg.clone(),
            BookingError::SessionExpired => "Sessao expirada. Entre novamente.".into(),
            BookingError::Request { action, .. } => action.failure_message().into(),
            BookingError::Config(_) => "Servico indisponivel no momento.".into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BookingError::IncompleteBooking
                | BookingError::IncompleteEdit
                | BookingError::NoChanges
                | BookingError::InvalidDateTime(_)
                | BookingError::UnavailableSelection(_)
                | BookingError::MissingService
                | BookingError::NoAppointment
                | BookingError::InvalidSearch(_)
        )
    }
}
