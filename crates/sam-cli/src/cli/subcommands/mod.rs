mod audit;
mod campaign;
mod check;
mod config;
mod linkedin;
mod n8n;
mod unipile;

pub use audit::AuditCommands;
pub use campaign::{CampaignCommands, LaunchArgs};
pub use check::CheckCommands;
pub use config::ConfigCommands;
pub use linkedin::LinkedinCommands;
pub use n8n::{N8nCommands, SetParamArgs};
pub use unipile::UnipileCommands;
