pub mod build;
pub mod dev;
pub mod import;
pub mod init;
pub mod serve;
pub mod templates;
