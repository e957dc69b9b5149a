// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing what the system
// works with: input rows, reconstructions, and the abstraction
// over where rows come from.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Input rows, reconstructions and the train/test split
pub mod sample;

// Core abstractions (traits) that other layers implement
pub mod traits;
