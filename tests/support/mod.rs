#![allow(dead_code)]

pub mod csv;
pub mod matrisk_env;
