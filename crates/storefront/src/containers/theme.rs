//! Color theme preference.

use bazaar_core::Theme;

use super::{Container, Persisted};
use crate::models::session_keys;

impl Persisted for Theme {
    const KEY: &'static str = session_keys::THEME;
}

pub type ThemeContainer = Container<Theme>;

impl Container<Theme> {
    /// Switch to the opposite theme, returning the new one.
    pub async fn toggle(&mut self) -> Theme {
        self.update(|theme| {
            *theme = theme.toggled();
            *theme
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::testing;

    #[tokio::test]
    async fn test_toggle_persists() {
        let storage = testing::storage();
        let mut theme = ThemeContainer::load(storage.clone()).await;
        assert_eq!(*theme.get(), Theme::Light);

        assert_eq!(theme.toggle().await, Theme::Dark);
        assert_eq!(*ThemeContainer::load(storage.clone()).await, Theme::Dark);

        assert_eq!(theme.toggle().await, Theme::Light);
        assert_eq!(*ThemeContainer::load(storage).await, Theme::Light);
    }
}
