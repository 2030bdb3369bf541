pub mod config;
pub mod logging;

pub mod control;
pub mod downloader;
pub mod fault;
pub mod report;
pub mod sampler;
pub mod supervisor;
pub mod target;
