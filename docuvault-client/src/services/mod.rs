pub mod analysis;
pub mod api_client;
pub mod token_store;
