//! Unit tests for the sync module.
//!
//! The test suite is split across focused submodules: cloning, subtree
//! copying, batch runs, dry-run planning, and the streaming runner.
