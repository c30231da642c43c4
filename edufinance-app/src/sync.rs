//! Cross-Page Sync Bus
//!
//! In-document notifications that shared state changed. The page that
//! wrote to the store emits right after the write; every other mounted page
//! reloads whatever it reads from the affected keys.

use shared_types::keys;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

const BUS_CAPACITY: usize = 64;

/// Page controllers that can originate events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Dashboard,
    Expenses,
    Analysis,
    Split,
    Profile,
    Tips,
    Auth,
    Shell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncKind {
    ExpensesUpdated,
    ThemeChanged,
    UserUpdated,
    SplitsUpdated,
    TipsProgressUpdated,
    RemindersUpdated,
    SessionChanged,
    DataCleared,
}

impl SyncKind {
    /// Event name as used by the web front end
    pub fn name(&self) -> &'static str {
        match self {
            SyncKind::ExpensesUpdated => "expensesUpdated",
            SyncKind::ThemeChanged => "themechange",
            SyncKind::UserUpdated => "userUpdated",
            SyncKind::SplitsUpdated => "splitsUpdated",
            SyncKind::TipsProgressUpdated => "tipsProgressUpdated",
            SyncKind::RemindersUpdated => "remindersUpdated",
            SyncKind::SessionChanged => "sessionChanged",
            SyncKind::DataCleared => "dataCleared",
        }
    }

    /// Storage keys whose contents changed when this event fires
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            SyncKind::ExpensesUpdated => &[keys::EXPENSES, keys::SELECTED_DATE],
            SyncKind::ThemeChanged => &[keys::THEME],
            SyncKind::UserUpdated => &[keys::USER],
            SyncKind::SplitsUpdated => &[keys::SPLIT_EXPENSES, keys::FRIENDS],
            SyncKind::TipsProgressUpdated => &[keys::TIPS_PROGRESS],
            SyncKind::RemindersUpdated => &[keys::REMINDERS],
            SyncKind::SessionChanged => &[keys::SESSION],
            SyncKind::DataCleared => &keys::ALL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncEvent {
    pub kind: SyncKind,
    pub source: PageKind,
}

/// One bus per document; tabs do not share it
#[derive(Clone)]
pub struct SyncBus {
    sender: broadcast::Sender<SyncEvent>,
}

impl SyncBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BUS_CAPACITY);
        Self { sender }
    }

    /// Notify listeners. Returns how many subscribers received the event.
    pub fn emit(&self, kind: SyncKind, source: PageKind) -> usize {
        match self.sender.send(SyncEvent { kind, source }) {
            Ok(receivers) => {
                tracing::debug!("{} from {:?} delivered to {} listeners", kind.name(), source, receivers);
                receivers
            }
            Err(_) => {
                tracing::debug!("{} from {:?} had no listeners", kind.name(), source);
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.sender.subscribe()
    }
}

impl Default for SyncBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull every queued message without waiting. The flag reports that the
/// receiver lagged and lost messages.
pub fn drain<T: Clone>(receiver: &mut broadcast::Receiver<T>) -> (Vec<T>, bool) {
    let mut items = Vec::new();
    let mut lagged = false;

    loop {
        match receiver.try_recv() {
            Ok(item) => items.push(item),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!("Sync listener lagged, {} events skipped", skipped);
                lagged = true;
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }

    (items, lagged)
}
