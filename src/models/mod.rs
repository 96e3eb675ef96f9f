//! Data models for Libris entities

pub mod author;
pub mod book;
pub mod loan;
pub mod user;
