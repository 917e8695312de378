pub mod cart_state_mapper;

pub use cart_state_mapper::CartStateRowMapper;
