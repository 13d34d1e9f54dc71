pub mod cleanup;
pub mod health;
pub mod proxy;
pub mod publish;
pub mod sites;
