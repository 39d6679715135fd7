//! REST API for the schoolrec recommender.

pub mod rest;

pub use rest::RestApi;
