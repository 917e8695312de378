mod cart_state_repo;

pub use cart_state_repo::DieselCartStateRepository;
