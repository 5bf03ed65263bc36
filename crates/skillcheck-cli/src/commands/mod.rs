pub mod assess;
pub mod dashboard;
pub mod import;
pub mod init;
pub mod osce;
pub mod results;
pub mod validate;
