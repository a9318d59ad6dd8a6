//! User-facing notices raised by list operations.

use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Language used to render notices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ar" => Ok(Self::Ar),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

/// Outcome of a compare-list operation that the user should hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    AddedToCompare,
    AlreadyInCompare,
    CompareFull { max: usize },
}

impl Notice {
    /// Whether the notice reports a rejected operation.
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::AddedToCompare)
    }

    pub fn message(&self, locale: Locale) -> String {
        match (self, locale) {
            (Self::AddedToCompare, Locale::En) => "Added to compare ⚖️".to_string(),
            (Self::AddedToCompare, Locale::Ar) => "تمت الإضافة للمقارنة ⚖️".to_string(),
            (Self::AlreadyInCompare, Locale::En) => "This tool is already in the list".to_string(),
            (Self::AlreadyInCompare, Locale::Ar) => "هذه الأداة موجودة في القائمة بالفعل".to_string(),
            (Self::CompareFull { max }, Locale::En) => {
                format!("You can compare up to {max} tools max")
            }
            (Self::CompareFull { max }, Locale::Ar) => {
                format!("يمكنك مقارنة {max} أدوات كحد أقصى")
            }
        }
    }
}

/// Sink for notices. Presentation belongs to the host.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, notice: &Notice) {
        (**self).notify(notice)
    }
}

/// Notifier that reports through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier {
    locale: Locale,
}

impl LogNotifier {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        let message = notice.message(self.locale);
        if notice.is_error() {
            warn!("{}", message);
        } else {
            info!("{}", message);
        }
    }
}

/// Notifier that keeps every notice until drained.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the notices received so far.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().push(notice.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_notice_names_the_limit() {
        let notice = Notice::CompareFull { max: 3 };
        assert_eq!(notice.message(Locale::En), "You can compare up to 3 tools max");
        assert!(notice.message(Locale::Ar).contains('3'));
        assert!(notice.is_error());
    }

    #[test]
    fn added_is_not_an_error() {
        assert!(!Notice::AddedToCompare.is_error());
        assert!(Notice::AlreadyInCompare.is_error());
    }

    #[test]
    fn locale_parses_case_insensitively() {
        assert_eq!("AR".parse::<Locale>().unwrap(), Locale::Ar);
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn recording_notifier_drains() {
        let notifier = RecordingNotifier::new();
        notifier.notify(&Notice::AddedToCompare);
        notifier.notify(&Notice::AlreadyInCompare);

        assert_eq!(
            notifier.take(),
            vec![Notice::AddedToCompare, Notice::AlreadyInCompare]
        );
        assert!(notifier.take().is_empty());
    }
}
