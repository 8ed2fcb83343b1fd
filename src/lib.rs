// src/lib.rs

//! wordcrawl: crawl a site from a seed page and rank its most frequent words.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
