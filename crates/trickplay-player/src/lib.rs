pub mod bus;
pub mod command;
pub mod config;
pub mod controller;
pub mod input;
pub mod pad;
pub mod pipeline;
pub mod rate;
pub mod seek;
