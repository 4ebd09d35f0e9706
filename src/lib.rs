// src/lib.rs

//! careerwatch: crawls career pages and reports new internship postings.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
