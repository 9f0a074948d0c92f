//! Lawyrs Crew - Legal query routing and multi-role pipeline orchestration
//!
//! This crate routes free-text legal questions to one of four specialist
//! roles (researcher, analyst, drafter, strategist) and runs either that role
//! or the full crew against an OpenAI-compatible completion engine.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
