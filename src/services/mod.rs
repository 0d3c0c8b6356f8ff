pub mod gainer_service;
pub mod index_service;
