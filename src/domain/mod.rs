// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types describing what the translator works with:
// vocabularies, reserved token ids and parallel sentence pairs,
// plus the traits the outer layers implement.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits

/// Word <-> index mapping for one language
pub mod vocabulary;

/// The four reserved token ids (pad, oov, sos, eos)
pub mod special_tokens;

/// A source/target pair of token-id sequences
pub mod sentence_pair;

/// Core abstractions (traits) that other layers implement
pub mod traits;
