//! HTTP request handlers for the upload API

pub mod upload;
