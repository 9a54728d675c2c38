//! Message-of-the-day banners.

use std::borrow::Cow;

/// Default banner.
pub const DEFAULT_BANNER: &str = r"   ________           __   __
  / ____/ /_  _______/ /__/ /
 / /   / / / / / ___/ //_/ /
/ /___/ / /_/ / /__/ ,< /_/
\____/_/\__,_/\___/_/|_(_)
";

/// Source of MOTD text.
pub trait BannerSource: Send + Sync {
    /// Returns the banner text sent in reply to `MOTD_REQUEST`.
    fn banner(&self) -> String;
}

/// Banner that always returns the same text.
#[derive(Debug, Clone)]
pub struct StaticBanner {
    text: Cow<'static, str>,
}

impl StaticBanner {
    /// Creates a banner returning `text`.
    #[must_use]
    pub fn new(text: impl Into<Cow<'static, str>>) -> Self {
        Self { text: text.into() }
    }
}

impl Default for StaticBanner {
    fn default() -> Self {
        Self::new(DEFAULT_BANNER)
    }
}

impl BannerSource for StaticBanner {
    fn banner(&self) -> String {
        self.text.clone().into_owned()
    }
}

impl<F> BannerSource for F
where
    F: Fn() -> String + Send + Sync,
{
    fn banner(&self) -> String {
        self()
    }
}
