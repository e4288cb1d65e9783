//! @acp:module "Model"
//! @acp:summary "Bridge configuration value objects and their persisted form"
//! @acp:domain dataset
//! @acp:layer model

pub mod config;
pub mod record;
pub mod types;

pub use config::{BoxGirderSection, BridgeConfig, DeckSection};
pub use record::{read_records, write_records, BridgeRecord, SUMMARY_FILE_NAME};
pub use types::{BridgeType, PierCapType, PierCrossSection, PierType};
