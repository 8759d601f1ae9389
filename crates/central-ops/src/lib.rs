pub mod ops_detect;
pub mod ops_modules;
pub mod ops_pom;
pub mod ops_publish;
pub mod ops_resolve;
pub mod ops_validate;
pub mod ops_wizard;
