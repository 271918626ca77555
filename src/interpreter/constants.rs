// Constants for the C interpreter

/// Default limit on nested user function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 512;

/// Remaining host stack below which deep evaluation grows onto the heap
pub const STACK_RED_ZONE: usize = 128 * 1024;

/// Size of each stack segment added when the red zone is reached
pub const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Name of the function both execution modes start from
pub const ENTRY_POINT: &str = "main";
