//! Theme Preference Use Case

use crate::domain::theme::{THEME_KEY, Theme};
use crate::error::AttendanceResult;
use platform::kv_store::KeyValueStore;
use std::sync::Arc;

/// Theme Preference Use Case
pub struct ThemePreferenceUseCase<S>
where
    S: KeyValueStore,
{
    store: Arc<S>,
}

impl<S> ThemePreferenceUseCase<S>
where
    S: KeyValueStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Saved preference; unknown stored values count as unset
    pub async fn load(&self) -> AttendanceResult<Option<Theme>> {
        let stored = self.store.get(THEME_KEY).await?;
        Ok(stored.and_then(|code| {
            let theme = Theme::from_code(&code);
            if theme.is_none() {
                tracing::warn!(value = %code, "Ignoring unknown stored theme");
            }
            theme
        }))
    }

    /// Theme to apply at startup
    pub async fn effective(&self) -> AttendanceResult<Theme> {
        Ok(self.load().await?.unwrap_or_default())
    }

    pub async fn set(&self, theme: Theme) -> AttendanceResult<Theme> {
        self.store.set(THEME_KEY, theme.code()).await?;
        tracing::info!(theme = %theme, "Theme preference saved");
        Ok(theme)
    }

    /// Toggle-switch change: checked means dark
    pub async fn set_dark(&self, dark: bool) -> AttendanceResult<Theme> {
        self.set(Theme::from_dark(dark)).await
    }

    pub async fn toggle(&self) -> AttendanceResult<Theme> {
        let current = self.effective().await?;
        self.set(current.toggled()).await
    }
}
