//! # Data Access Crate
//!
//! Everything the recommendation service reads from its data store.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Course, Advisor, Enrollment)
//! - **store**: The `DataStore` trait the rest of the service depends on
//! - **supabase**: PostgREST client implementing `DataStore`
//! - **memory**: In-memory `DataStore`, loadable from a JSON fixture
//! - **error**: Error types for data access
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_access::{DataStore, SupabaseStore};
//! use std::time::Duration;
//!
//! let store = SupabaseStore::new(url, key, Duration::from_secs(10))?;
//! let courses = store.fetch_all_courses().await?;
//! let mine = store.fetch_enrolled_ids(42).await?;
//!
//! println!("{} courses, student 42 is in {}", courses.len(), mine.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod store;
pub mod supabase;
pub mod memory;
pub mod fixture;

// Re-export commonly used types for convenience
pub use error::{DataAccessError, Result};
pub use memory::MemoryStore;
pub use store::DataStore;
pub use supabase::SupabaseStore;
pub use types::{
    // Type aliases
    CourseId,
    StudentId,
    // Core types
    Advisor,
    Course,
    Enrollment,
};
