use async_trait::async_trait;
use diesel::prelude::*;

use mg_core::cart::StoredCart;
use mg_core::ports::CartStorePort;

use crate::db::mappers::CartStateRowMapper;
use crate::db::models::{CartStateRow, NewCartStateRow};
use crate::db::ports::{DbExecutor, InsertMapper, RowMapper};
use crate::db::schema::t_cart_state::dsl::*;

/// Cart store backed by one row of `t_cart_state`.
pub struct DieselCartStateRepository<E> {
    executor: E,
    mapper: CartStateRowMapper,
}

impl<E> DieselCartStateRepository<E> {
    pub fn new(executor: E, mapper: CartStateRowMapper) -> Self {
        Self { executor, mapper }
    }
}

#[async_trait]
impl<E> CartStorePort for DieselCartStateRepository<E>
where
    E: DbExecutor,
{
    async fn load(&self) -> anyhow::Result<Option<StoredCart>> {
        let key = self.mapper.storage_key().to_string();
        let row = self.executor.run(move |conn| {
            t_cart_state
                .filter(storage_key.eq(&key))
                .first::<CartStateRow>(conn)
                .optional()
                .map_err(|e| anyhow::anyhow!("load cart state: {e}"))
        })?;

        match row {
            Some(r) => Ok(Some(self.mapper.to_domain(&r)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, cart: &StoredCart) -> anyhow::Result<()> {
        let row: NewCartStateRow = self.mapper.to_row(cart)?;

        self.executor.run(move |conn| {
            diesel::insert_into(t_cart_state)
                .values(&row)
                .on_conflict(storage_key)
                .do_update()
                .set((payload.eq(&row.payload), updated_at.eq(row.updated_at)))
                .execute(conn)
                .map_err(|e| anyhow::anyhow!("save cart state: {e}"))?;
            Ok(())
        })
    }
}
