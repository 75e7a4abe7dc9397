//! Tests for the API key service
