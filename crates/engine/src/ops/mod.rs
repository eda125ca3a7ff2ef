use std::{future::Future, pin::Pin};

use chrono::Duration;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::{EngineError, ResultEngine};

mod access;
mod boosts;
mod browse;
mod circles;
mod items;
mod meetings;
mod notifications;
mod swaps;
mod users;

pub use browse::{BrowseFilter, BrowsedItem};
pub use circles::{CircleDetail, CircleSummary};
pub use items::ItemDetail;
pub use notifications::NotificationPage;
pub use swaps::{SwapDetail, SwapDirection};
pub use users::UserProfile;

const DEFAULT_BOOST_HOURS: i64 = 24;

type TxFuture<'a, T> = Pin<Box<dyn Future<Output = ResultEngine<T>> + Send + 'a>>;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    boost_duration: Duration,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// How long a boost keeps an item on top of browse results.
    pub fn boost_duration(&self) -> Duration {
        self.boost_duration
    }

    /// Run `f` inside a DB transaction, committing on success and rolling
    /// back on error.
    pub(crate) async fn with_tx<T, F>(&self, f: F) -> ResultEngine<T>
    where
        T: Send,
        F: for<'a> FnOnce(&'a Engine, &'a DatabaseTransaction) -> TxFuture<'a, T> + Send,
    {
        let db_tx = self.database.begin().await?;
        match f(self, &db_tx).await {
            Ok(value) => {
                db_tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                db_tx.rollback().await?;
                Err(err)
            }
        }
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    boost_duration: Option<Duration>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the boost lifetime (24 hours by default).
    pub fn boost_duration(mut self, duration: Duration) -> EngineBuilder {
        self.boost_duration = Some(duration);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let boost_duration = self
            .boost_duration
            .unwrap_or_else(|| Duration::hours(DEFAULT_BOOST_HOURS));
        if boost_duration <= Duration::zero() {
            return Err(EngineError::Invalid(
                "boost duration must be positive".to_string(),
            ));
        }
        Ok(Engine {
            database: self.database,
            boost_duration,
        })
    }
}
