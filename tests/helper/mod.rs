#![allow(dead_code)]

pub mod retriever;
