pub mod config;
pub mod credentials;
pub mod error;
pub mod locate;
pub mod remote;
pub mod resolve;
pub mod session;
pub mod status;
pub mod submit;
