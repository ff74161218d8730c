//! Workspace-level integration tests for negafft; see `tests/`.
