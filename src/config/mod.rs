//! Configuration module

mod site;

pub use site::BlogConfig;
pub use site::ServerConfig;
pub use site::StoreConfig;
pub use site::StoreKind;
