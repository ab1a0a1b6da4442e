//! FoundersTruth: a local web form that sends a startup idea to a
//! generative-language provider and renders the structured critique.

pub mod analytics;
pub mod cli;
pub mod config;
pub mod evaluation;
pub mod llm;
pub mod render;
pub mod view;
pub mod web;
