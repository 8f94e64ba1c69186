use super::{Connect, Db, Pool, PoolConfig, Shared, Timeouts};
use crate::Result;

use quarry_core::driver::Driver;

use std::{sync::Arc, time::Duration};

#[derive(Debug, Default)]
pub struct Builder {
    pool_config: PoolConfig,
}

impl Builder {
    /// Upper bound on pooled connections. Drivers that only support fewer
    /// (in-memory SQLite) lower it further.
    pub fn max_pool_size(&mut self, max_size: usize) -> &mut Self {
        self.pool_config.max_size = max_size;
        self
    }

    /// How long to wait for a free connection before failing.
    pub fn pool_wait_timeout(&mut self, timeout: Option<Duration>) -> &mut Self {
        self.pool_config.timeouts.wait = timeout;
        self
    }

    pub fn pool_timeouts(&mut self, timeouts: Timeouts) -> &mut Self {
        self.pool_config.timeouts = timeouts;
        self
    }

    pub async fn connect(&mut self, url: &str) -> Result<Db> {
        self.build(Connect::new(url)?).await
    }

    pub async fn build(&mut self, driver: impl Driver) -> Result<Db> {
        let url = driver.url().into_owned();
        let pool = Pool::new(driver, self.pool_config.clone()).await?;

        tracing::debug!(%url, "connected");

        Ok(Db {
            shared: Arc::new(Shared { pool }),
        })
    }
}
