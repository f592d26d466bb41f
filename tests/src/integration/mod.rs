//! Cross-crate integration flows.


mod e2e_build;
