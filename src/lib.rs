//! booruget assembles uniformly sized image+caption training datasets from
//! Danbooru-style imageboards
//!
//! the pipeline: search by one or two tags, paginate to exhaustion, filter
//! by include/exclude tag lists, group survivors by rounded aspect ratio,
//! pick the most populous ratio bucket, then download and resize everything
//! in it to the smallest member's resolution, writing a caption sidecar per
//! image.

pub mod bucket;
pub mod cli;
pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod models;
pub mod tags;
