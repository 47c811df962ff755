//! Memory Allocator Configuration
//!
//! The binary runs on mimalloc instead of the system allocator. Chunk buffers
//! are allocated once per file, so the allocator mostly matters for the
//! argument parsing, prompt and progress bar around them.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
