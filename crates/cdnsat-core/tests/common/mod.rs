#![allow(dead_code)]

pub mod doubles;
pub mod http_server;
