pub mod audit;
pub mod campaign;
pub mod check;
pub mod classify;
pub mod config;
pub mod dispatch;
pub mod linkedin;
pub mod n8n;
pub mod shared;
pub mod unipile;
