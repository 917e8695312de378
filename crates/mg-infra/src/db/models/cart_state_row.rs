use crate::db::schema::t_cart_state;
use diesel::prelude::*;

#[derive(Debug, Queryable)]
#[diesel(table_name = t_cart_state)]
pub struct CartStateRow {
    pub storage_key: String,
    pub payload: String,
    pub updated_at: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = t_cart_state)]
pub struct NewCartStateRow {
    pub storage_key: String,
    pub payload: String,
    pub updated_at: i64,
}
