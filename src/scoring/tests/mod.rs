mod common;
mod engine;
mod relevance;
