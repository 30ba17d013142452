// Library interface for newspulse modules
// This allows tests and the binaries to import the pipeline stages

pub mod compare;
pub mod entities;
pub mod ingestion;
pub mod keywords;
pub mod pipeline;
pub mod report;
pub mod sentiment;
pub mod service;
pub mod storage;
pub mod text;
pub mod tts;
