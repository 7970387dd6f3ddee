mod file_active_pointer;
mod in_memory_active_pointer;

pub use file_active_pointer::{FileActivePointer, POINTER_FILE_NAME};
pub use in_memory_active_pointer::InMemoryActivePointer;
