pub mod attribution;
pub mod catalog;
pub mod config;
pub mod environment;
pub mod errors;
pub mod experience;
pub mod filters;
pub mod i18n;
pub mod locale;
pub mod normalization;
pub mod recommend;
pub mod routes;
pub mod urls;
