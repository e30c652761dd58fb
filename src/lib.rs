//! # vkc CLI Library
//!
//! Core functionality for the `vkc` command-line tool: a declarative
//! argument parser, Keystone session establishment, and the block-storage
//! volume retype workflow (resolve an ID or name, then issue the action).

pub mod args;
pub mod auth;
pub mod commands;
pub mod error;
pub mod volumes;
