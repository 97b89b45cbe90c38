// src/ffi.rs
// The Language Descriptor Provider: one process-lifetime record, one
// exported symbol.

use std::sync::LazyLock;

use crate::language::{self, Language};

// Built on first request, immutable and address-stable afterwards. The
// grammar is baked into the crate, so a build failure here is a defect the
// conformance tests catch; there is no runtime recovery path.
static LANGUAGE: LazyLock<Language> = LazyLock::new(|| {
    language::build_language()
        .unwrap_or_else(|e| panic!("ghostlang descriptor failed to build: {e}"))
});

/// The ghostlang Language Descriptor, for Rust callers.
pub fn language() -> &'static Language {
    &LANGUAGE
}

/// Returns a handle to the ghostlang Language Descriptor.
///
/// The pointer is non-null, refers to an immutable record that lives until
/// process exit, and is the same value on every call; it is safe to call
/// from any thread and may be cached by the host indefinitely. Callers must
/// not attempt to free it.
#[unsafe(no_mangle)]
pub extern "C" fn tree_sitter_ghostlang() -> *const Language {
    std::ptr::from_ref(language())
}
