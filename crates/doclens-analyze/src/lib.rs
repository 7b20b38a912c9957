//! Upload acceptance and the simulated analysis backend.

pub mod analyzer;
pub mod upload;

pub use analyzer::{
    ANALYSIS_STEPS, AnalysisError, Analyzer, MockAnalyzer, analyze_with_timeout, document_preview,
    mock_report,
};
pub use upload::{InputRejected, UploadPolicy};
