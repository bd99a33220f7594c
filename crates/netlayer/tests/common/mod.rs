//! Common test utilities and helpers

use netlayer::{PipelineConfig, RequestDescriptor, RequestDescriptorBuilder, RequestPipeline};
use serde::Deserialize;
use std::path::Path;

/// Load a response fixture
#[allow(dead_code)]
pub fn load_response_fixture(name: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = Path::new(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join("responses")
        .join(format!("{}.json", name));

    std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "Failed to load response fixture '{}' from {:?}: {}",
            name, path, e
        )
    })
}

/// Create a test API key
#[allow(dead_code)]
pub fn test_api_key() -> String {
    "test-key-0123456789abcdef".to_string()
}

/// Pipeline over a real HTTP transport
#[allow(dead_code)]
pub fn http_pipeline(config: PipelineConfig) -> RequestPipeline {
    RequestPipeline::with_http_transport(config).expect("Failed to create pipeline")
}

/// Descriptor builder pointed at the mock server
#[allow(dead_code)]
pub fn descriptor(base_url: &str, path: &str) -> RequestDescriptorBuilder {
    let mut builder = RequestDescriptor::builder();
    builder.base_url(base_url).path(path);
    builder
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct MoviePage {
    pub page: u32,
    pub total_pages: u32,
    pub results: Vec<Movie>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize, PartialEq)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub vote_average: f64,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct ListCreated {
    pub id: u64,
    pub success: bool,
    pub status_message: String,
}
