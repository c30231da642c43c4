use shared_types::{keys, Theme};

use super::Page;
use crate::context::AppContext;
use crate::sync::{PageKind, SyncKind};

/// Chrome shared by all pages. Owns the theme.
pub struct ShellPage {
    ctx: AppContext,
    pub theme: Theme,
}

impl ShellPage {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            theme: Theme::default(),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if self.ctx.store.save(keys::THEME, &theme) {
            self.ctx.emit(SyncKind::ThemeChanged, Self::KIND);
        }
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.theme.toggled();
        self.set_theme(theme);
        theme
    }
}

impl Page for ShellPage {
    const KIND: PageKind = PageKind::Shell;
    const WATCHED_KEYS: &'static [&'static str] = &[keys::THEME];

    fn context(&self) -> &AppContext {
        &self.ctx
    }

    fn load(&mut self) {
        self.theme = self.ctx.store.load(keys::THEME, &Theme::default());
    }
}
