use crate::Result;

use quarry_core::{
    async_trait,
    driver::{Capability, Connection, Driver},
    Error,
};
use std::borrow::Cow;
use url::Url;

/// A driver selected by the scheme of a connection URL.
///
/// `sqlite:` and `mysql:` URLs are supported when the matching cargo
/// feature is enabled.
#[derive(Debug)]
pub struct Connect {
    driver: Box<dyn Driver>,
}

impl Connect {
    pub fn new(url: &str) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url}")))?;

        let driver = match parsed.scheme() {
            "mysql" => mysql(url)?,
            "sqlite" => sqlite(url)?,
            scheme => {
                return Err(Error::invalid_connection_url(format!(
                    "unsupported database; scheme={scheme}; url={url}"
                )))
            }
        };

        Ok(Self { driver })
    }
}

#[async_trait]
impl Driver for Connect {
    fn url(&self) -> Cow<'_, str> {
        self.driver.url()
    }

    fn capability(&self) -> &'static Capability {
        self.driver.capability()
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        self.driver.connect().await
    }

    fn max_connections(&self) -> Option<usize> {
        self.driver.max_connections()
    }
}

#[cfg(feature = "mysql")]
fn mysql(url: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(quarry_driver_mysql::MySQL::new(url)?))
}

#[cfg(not(feature = "mysql"))]
fn mysql(_url: &str) -> Result<Box<dyn Driver>> {
    Err(Error::unsupported_feature("`mysql` feature not enabled"))
}

#[cfg(feature = "sqlite")]
fn sqlite(url: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(quarry_driver_sqlite::Sqlite::new(url)?))
}

#[cfg(not(feature = "sqlite"))]
fn sqlite(_url: &str) -> Result<Box<dyn Driver>> {
    Err(Error::unsupported_feature("`sqlite` feature not enabled"))
}
