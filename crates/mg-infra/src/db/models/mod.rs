mod cart_state_row;

pub use cart_state_row::{CartStateRow, NewCartStateRow};
