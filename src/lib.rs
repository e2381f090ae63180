//! newsdesk: terminal admin console for a news CMS backend.
//!
//! The library half holds everything that does not touch the terminal:
//! the REST client ([`api`]), per-entity state containers ([`store`]), the
//! category tree with lazy article counts ([`tree`]), client-side listing
//! ([`listing`]) and form validation ([`forms`]). The console itself lives in
//! [`app`], [`editor`] and [`ui`].

pub mod api;
pub mod app;
pub mod config;
pub mod editor;
pub mod forms;
pub mod listing;
pub mod models;
pub mod store;
pub mod tree;
pub mod ui;
pub mod util;
