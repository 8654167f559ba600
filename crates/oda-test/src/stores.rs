//! Marker-trait implementations for the opaque artifact/memory collaborators.

use oda_engine::{ArtifactStore, MemoryStore};

/// An empty [`ArtifactStore`]; the retrying executor never examines it directly.
#[derive(Debug, Default)]
pub struct StubArtifactStore;

impl ArtifactStore for StubArtifactStore {}

/// An empty [`MemoryStore`]; the retrying executor never examines it directly.
#[derive(Debug, Default)]
pub struct StubMemoryStore;

impl MemoryStore for StubMemoryStore {}
