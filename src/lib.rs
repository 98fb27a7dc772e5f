//! A terminal portfolio: profile sections, project pages rendered from
//! their README files, a demo media player and a contact form.

pub mod app;
pub mod catalog;
pub mod config;
pub mod contact;
pub mod events;
pub mod input;
pub mod logging;
pub mod player;
pub mod readme;
pub mod ui;
