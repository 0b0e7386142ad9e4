//! User-facing texts for notifications raised by the session services.

use crate::store::NotificationKind;
use serde::{Deserialize, Serialize};

/// Language of the texts produced by the store and the monitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    #[default]
    En,
    PtBr,
}

impl Locale {
    /// Title used by the `notify_*` helpers when the caller passes none.
    pub fn default_title(self, kind: NotificationKind) -> &'static str {
        match (self, kind) {
            (Locale::En, NotificationKind::Success) => "Success",
            (Locale::En, NotificationKind::Error) => "Error",
            (Locale::En, NotificationKind::Warning) => "Warning",
            (Locale::En, NotificationKind::Info) => "Info",
            (Locale::PtBr, NotificationKind::Success) => "Sucesso",
            (Locale::PtBr, NotificationKind::Error) => "Erro",
            (Locale::PtBr, NotificationKind::Warning) => "Atenção",
            (Locale::PtBr, NotificationKind::Info) => "Informação",
        }
    }

    pub fn session_expiring_title(self) -> &'static str {
        match self {
            Locale::En => "Session Expiring",
            Locale::PtBr => "Sessão Expirando",
        }
    }

    /// Warning shown when the idle budget is about to run out.
    ///
    /// `minutes` is the whole number of minutes left before logout.
    pub fn session_expiring_message(self, minutes: u64) -> String {
        match (self, minutes) {
            (Locale::En, 0) => "Your session will end in less than a minute due to inactivity. \
                 Move the mouse or press a key to continue."
                .to_string(),
            (Locale::En, 1) => "Your session will end in 1 minute due to inactivity. \
                 Move the mouse or press a key to continue."
                .to_string(),
            (Locale::En, n) => format!(
                "Your session will end in {n} minutes due to inactivity. \
                 Move the mouse or press a key to continue."
            ),
            (Locale::PtBr, 0) => "Sua sessão será encerrada em menos de um minuto por inatividade. \
                 Mova o mouse ou pressione uma tecla para continuar."
                .to_string(),
            (Locale::PtBr, 1) => "Sua sessão será encerrada em 1 minuto por inatividade. \
                 Mova o mouse ou pressione uma tecla para continuar."
                .to_string(),
            (Locale::PtBr, n) => format!(
                "Sua sessão será encerrada em {n} minutos por inatividade. \
                 Mova o mouse ou pressione uma tecla para continuar."
            ),
        }
    }

    pub fn session_ended_title(self) -> &'static str {
        match self {
            Locale::En => "Session Ended",
            Locale::PtBr => "Sessão Encerrada",
        }
    }

    pub fn session_ended_message(self) -> &'static str {
        match self {
            Locale::En => "Your session was ended due to inactivity. Log in again to continue.",
            Locale::PtBr => {
                "Sua sessão foi encerrada por inatividade. Faça login novamente para continuar."
            }
        }
    }
}
