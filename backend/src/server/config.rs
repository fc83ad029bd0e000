//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use foodgram::AppSettings;
use foodgram::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) media_root: PathBuf,
    pub(crate) media_url: String,
    pub(crate) page_size: u32,
}

impl ServerConfig {
    /// Construct a configuration with the default media location and page
    /// size.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            bind_addr,
            db_pool,
            media_root: PathBuf::from("media"),
            media_url: "/media/".to_owned(),
            page_size: pagination::DEFAULT_PAGE_SIZE,
        }
    }

    /// Take media and paging options from loaded settings.
    #[must_use]
    pub fn with_settings(self, settings: &AppSettings) -> Self {
        self.with_media(settings.media_root(), settings.media_url())
            .with_page_size(settings.page_size())
    }

    /// Directory uploaded images are written to and the URL prefix they are
    /// served under.
    #[must_use]
    pub fn with_media(mut self, root: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        self.media_root = root.into();
        self.media_url = url.into();
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[must_use]
    pub fn media_root(&self) -> &Path {
        &self.media_root
    }
}
