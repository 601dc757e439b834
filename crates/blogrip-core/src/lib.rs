pub mod config;
pub mod logging;

pub mod dedup;
pub mod downloader;
pub mod feed;
pub mod http;
pub mod index;
pub mod media;
pub mod proxy;
pub mod queue;
pub mod resolver;
pub mod retry;
pub mod scheduler;
pub mod sites;
pub mod url_model;
pub mod worker;
