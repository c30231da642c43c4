use shared_types::{defaults, keys, Tip, TipsProgress};

use super::Page;
use crate::context::AppContext;
use crate::sync::{PageKind, SyncKind};

pub struct TipsPage {
    ctx: AppContext,
    pub tips: Vec<Tip>,
    pub progress: TipsProgress,
}

impl TipsPage {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            tips: defaults::tips(),
            progress: TipsProgress::new(),
        }
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.progress.get(id).copied().unwrap_or(false)
    }

    /// Flip completion of a tip. `None` for an unknown tip id.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        if !self.tips.iter().any(|t| t.id == id) {
            return None;
        }

        let completed = !self.is_completed(id);
        self.progress.insert(id.to_string(), completed);
        if self.ctx.store.save(keys::TIPS_PROGRESS, &self.progress) {
            self.ctx.emit(SyncKind::TipsProgressUpdated, Self::KIND);
        }
        Some(completed)
    }

    /// Share of tips completed, 0 to 100
    pub fn progress_percent(&self) -> f64 {
        if self.tips.is_empty() {
            return 0.0;
        }
        let done = self.tips.iter().filter(|t| self.is_completed(&t.id)).count();
        done as f64 / self.tips.len() as f64 * 100.0
    }
}

impl Page for TipsPage {
    const KIND: PageKind = PageKind::Tips;
    const WATCHED_KEYS: &'static [&'static str] = &[keys::TIPS_PROGRESS];

    fn context(&self) -> &AppContext {
        &self.ctx
    }

    fn load(&mut self) {
        self.progress = self.ctx.store.load(keys::TIPS_PROGRESS, &TipsProgress::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{day, test_context};

    #[test]
    fn test_toggle_and_progress() {
        let ctx = test_context(day("2025-11-20"));
        let mut page = TipsPage::new(ctx.clone());
        page.load();
        assert_eq!(page.progress_percent(), 0.0);

        assert_eq!(page.toggle("budget-basics"), Some(true));
        assert_eq!(page.toggle("track-daily"), Some(true));
        assert_eq!(page.progress_percent(), 40.0);

        assert_eq!(page.toggle("budget-basics"), Some(false));
        assert_eq!(page.toggle("no-such-tip"), None);

        let mut reopened = TipsPage::new(ctx);
        reopened.load();
        assert!(reopened.is_completed("track-daily"));
        assert!(!reopened.is_completed("budget-basics"));
    }
}
